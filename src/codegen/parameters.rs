use crate::definition::{
    Expr, MethodDefinition, ParameterDefinition, Stmt, TypeRef, Visibility,
};
use crate::error::GenerationError;
use crate::name::{dto_class_name, safe_variable_name};
use crate::spec::Parameter;
use crate::types::{Element, SimpleType, TypeClass, TypeClassifier};

use log::trace;
use std::collections::HashMap;

/// Turns specification parameters into constructor parameters. Non-primitive types are
/// qualified with `namespace`.
pub struct ParameterMaterializer<'a> {
    classifier: &'a TypeClassifier<'a>,
    namespace: String,
    visibility: Visibility,
}

impl<'a> ParameterMaterializer<'a> {
    pub fn new(classifier: &'a TypeClassifier<'a>, namespace: impl Into<String>) -> Self {
        Self {
            classifier,
            namespace: namespace.into(),
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn type_ref(&self, class: &TypeClass) -> TypeRef {
        match class {
            TypeClass::Primitive(simple) => TypeRef::Simple(*simple),
            TypeClass::Object(name) => TypeRef::class(&self.namespace, &dto_class_name(name)),
            TypeClass::Array(Element::Object(name)) => {
                TypeRef::list_of(TypeRef::class(&self.namespace, &dto_class_name(name)))
            }
            TypeClass::Array(Element::Primitive(simple)) => {
                TypeRef::list_of(TypeRef::Simple(*simple))
            }
            TypeClass::Array(Element::Unknown) => TypeRef::Simple(SimpleType::Array),
        }
    }

    pub fn doc_type(class: &TypeClass, nullable: bool) -> String {
        let ty = match class {
            TypeClass::Primitive(simple) => simple.to_string(),
            TypeClass::Object(name) => dto_class_name(name),
            TypeClass::Array(Element::Object(name)) => format!("{}[]", dto_class_name(name)),
            TypeClass::Array(Element::Primitive(simple)) => format!("{simple}[]"),
            TypeClass::Array(Element::Unknown) => SimpleType::Array.to_string(),
        };
        if nullable {
            format!("{ty}|null")
        } else {
            ty
        }
    }

    /// Materializes one parameter and hands back its classification as well.
    pub fn materialize_classified(
        &self,
        parameter: &Parameter,
        owner: &str,
    ) -> Result<(ParameterDefinition, TypeClass), GenerationError> {
        let class = self.classifier.classify_parameter(parameter, owner)?;
        let name = safe_variable_name(&parameter.name);
        trace!("materializing `{}` of `{owner}` as `{name}`", parameter.name);

        let definition = ParameterDefinition {
            name,
            ty: self.type_ref(&class),
            nullable: parameter.nullable,
            read_only: true,
            promoted: Some(self.visibility),
            default: parameter.nullable.then_some(Expr::Null),
            doc_type: Some(Self::doc_type(&class, parameter.nullable)),
            description: parameter
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        Ok((definition, class))
    }

    pub fn materialize(
        &self,
        parameter: &Parameter,
        owner: &str,
    ) -> Result<ParameterDefinition, GenerationError> {
        self.materialize_classified(parameter, owner)
            .map(|(definition, _)| definition)
    }

    /// One definition per parameter, in input order.
    pub fn materialize_all<'p>(
        &self,
        parameters: impl IntoIterator<Item = &'p Parameter>,
        owner: &str,
    ) -> Result<Vec<ParameterDefinition>, GenerationError> {
        parameters
            .into_iter()
            .map(|parameter| self.materialize(parameter, owner))
            .collect()
    }

    /// Accessor returning each parameter's bound value keyed by its name, without the
    /// entries that are null at call time.
    pub fn default_values_method<'p>(
        name: &str,
        parameters: impl IntoIterator<Item = &'p Parameter>,
    ) -> MethodDefinition {
        let entries = parameters
            .into_iter()
            .map(|parameter| {
                (
                    parameter.name.clone(),
                    Expr::property(safe_variable_name(&parameter.name)),
                )
            })
            .collect();

        let mut method = MethodDefinition::new(name, TypeRef::Simple(SimpleType::Array));
        method.body.push(Stmt::Return {
            value: Expr::FilterNulls(Box::new(Expr::Map(entries))),
        });
        method
    }
}

/// Constructor parameter names already taken in one class, keyed by resolved name.
#[derive(Debug, Default)]
pub struct ParameterNames {
    taken: HashMap<String, String>,
}

impl ParameterNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the resolved name of `raw`, failing if another parameter of `owner`
    /// already resolved to it.
    pub fn claim(&mut self, raw: &str, owner: &str) -> Result<(), GenerationError> {
        let name = safe_variable_name(raw);
        if let Some(first) = self.taken.get(&name) {
            return Err(GenerationError::DuplicateParameter {
                owner: owner.to_string(),
                name,
                first: first.clone(),
                second: raw.to_string(),
            });
        }
        self.taken.insert(name, raw.to_string());
        Ok(())
    }

    pub fn claim_all<'p>(
        &mut self,
        parameters: impl IntoIterator<Item = &'p Parameter>,
        owner: &str,
    ) -> Result<(), GenerationError> {
        parameters
            .into_iter()
            .try_for_each(|parameter| self.claim(&parameter.name, owner))
    }
}
