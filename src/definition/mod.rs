//! Language-neutral class definitions produced by the builders and consumed by an
//! [`Emitter`](crate::emit::Emitter).

pub mod eval;
mod expr;

pub use expr::{Expr, MatchArm, Part, Stmt};

use crate::types::SimpleType;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Dto,
    Response,
    Request,
    BaseResource,
}

/// Behaviour a class opts into. The emitter decides how each one is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Can be built from a generic key-value mapping by the shared hydration helper.
    Deserializable,
    /// Keeps a handle on the HTTP response it was built from.
    WithResponse,
    HasBody,
    JsonBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Types supplied by the HTTP runtime the generated code runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeType {
    Connector,
    HttpMethod,
    HttpResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    Simple(SimpleType),
    /// Fully-qualified name of a generated class.
    Class(String),
    List(Box<TypeRef>),
    Union(Vec<TypeRef>),
    Runtime(RuntimeType),
}

impl TypeRef {
    pub fn class(namespace: &str, name: &str) -> Self {
        TypeRef::Class(format!("{namespace}\\{name}"))
    }

    pub fn list_of(ty: TypeRef) -> Self {
        TypeRef::List(Box::new(ty))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub nullable: bool,
    pub read_only: bool,
    /// Set when the parameter doubles as a property of that visibility.
    pub promoted: Option<Visibility>,
    pub default: Option<Expr>,
    /// Semantic type as written in documentation, e.g. `Widget[]|null`.
    pub doc_type: Option<String>,
    pub description: Option<String>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            read_only: false,
            promoted: None,
            default: None,
            doc_type: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub is_static: bool,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<ParameterDefinition>,
    pub return_type: Option<TypeRef>,
    pub body: Vec<Stmt>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: vec![],
            return_type: Some(return_type),
            body: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDefinition {
    pub namespace: String,
    pub name: String,
    pub kind: ClassKind,
    pub is_final: bool,
    pub comment: Vec<String>,
    pub capabilities: Vec<Capability>,
    pub properties: Vec<PropertyDefinition>,
    /// `None` when the class has no constructor at all.
    pub constructor: Option<Vec<ParameterDefinition>>,
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            is_final: false,
            comment: vec![],
            capabilities: vec![],
            properties: vec![],
            constructor: None,
            methods: vec![],
        }
    }

    pub fn fqn(&self) -> String {
        format!("{}\\{}", self.namespace, self.name)
    }

    pub fn add_capability(&mut self, capability: Capability) {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Appends a constructor parameter, creating the constructor on first use.
    pub fn add_constructor_parameter(&mut self, parameter: ParameterDefinition) {
        self.constructor.get_or_insert_with(Vec::new).push(parameter);
    }

    pub fn constructor_parameters(&self) -> &[ParameterDefinition] {
        self.constructor.as_deref().unwrap_or_default()
    }

    pub fn constructor_parameter_names(&self) -> Vec<&str> {
        self.constructor_parameters()
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }
}
