use crate::error::GenerationError;
use crate::spec::{ApiSpecification, Parameter, Schema};

use log::trace;
use serde::Serialize;
use std::fmt;

/// The closed set of primitive type tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    String,
    Integer,
    Number,
    Boolean,
    /// An array whose elements are not described.
    Array,
    Date,
    DateTime,
    Null,
}

impl SimpleType {
    pub fn from_token(token: &str) -> Option<Self> {
        let ty = match token {
            "string" => SimpleType::String,
            "integer" => SimpleType::Integer,
            "number" => SimpleType::Number,
            "boolean" => SimpleType::Boolean,
            "array" => SimpleType::Array,
            "date" => SimpleType::Date,
            "datetime" => SimpleType::DateTime,
            "null" => SimpleType::Null,
            _ => return None,
        };

        Some(ty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleType::String => "string",
            SimpleType::Integer => "integer",
            SimpleType::Number => "number",
            SimpleType::Boolean => "boolean",
            SimpleType::Array => "array",
            SimpleType::Date => "date",
            SimpleType::DateTime => "datetime",
            SimpleType::Null => "null",
        }
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Unknown,
    Primitive(SimpleType),
    /// Name of a schema in the specification.
    Object(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass {
    Primitive(SimpleType),
    /// Name of a schema in the specification.
    Object(String),
    Array(Element),
}

impl TypeClass {
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeClass::Primitive(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TypeClass::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeClass::Array(_))
    }

    /// Element schema name of an array of objects.
    pub fn complex_element(&self) -> Option<&str> {
        match self {
            TypeClass::Array(Element::Object(name)) => Some(name),
            _ => None,
        }
    }
}

pub struct TypeClassifier<'a> {
    spec: &'a ApiSpecification,
}

impl<'a> TypeClassifier<'a> {
    pub fn new(spec: &'a ApiSpecification) -> Self {
        Self { spec }
    }

    /// Resolves a non-primitive token to a named schema.
    pub fn resolve(&self, token: &str, owner: &str) -> Result<&'a Schema, GenerationError> {
        self.spec
            .schema(token)
            .ok_or_else(|| GenerationError::UnresolvedType {
                token: token.to_string(),
                owner: owner.to_string(),
            })
    }

    fn classify_token(&self, token: &str, owner: &str) -> Result<TypeClass, GenerationError> {
        if let Some(simple) = SimpleType::from_token(token) {
            return Ok(TypeClass::Primitive(simple));
        }
        self.resolve(token, owner)?;
        Ok(TypeClass::Object(token.to_string()))
    }

    fn classify_element(
        &self,
        items: Option<&Schema>,
        owner: &str,
    ) -> Result<Element, GenerationError> {
        let Some(items) = items else {
            return Ok(Element::Unknown);
        };
        let element = match self.classify_schema(items, owner)? {
            TypeClass::Primitive(simple) => Element::Primitive(simple),
            TypeClass::Object(name) => Element::Object(name),
            // nested arrays hydrate as plain lists
            TypeClass::Array(_) => Element::Primitive(SimpleType::Array),
        };
        Ok(element)
    }

    pub fn classify_schema(
        &self,
        schema: &Schema,
        owner: &str,
    ) -> Result<TypeClass, GenerationError> {
        let class = if schema.is_array() {
            TypeClass::Array(self.classify_element(schema.items.as_deref(), owner)?)
        } else if schema.is_object() {
            match schema.name() {
                Some(name) => TypeClass::Object(name.to_string()),
                None => {
                    return Err(GenerationError::UnresolvedType {
                        token: "object".into(),
                        owner: owner.to_string(),
                    })
                }
            }
        } else {
            self.classify_token(schema.type_(), owner)?
        };
        trace!("classified schema {:?} in `{owner}` as {class:?}", schema.name());
        Ok(class)
    }

    pub fn classify_parameter(
        &self,
        parameter: &Parameter,
        owner: &str,
    ) -> Result<TypeClass, GenerationError> {
        let owner = format!("{owner}.{}", parameter.name);
        let class = if parameter.type_ == "array" {
            TypeClass::Array(self.classify_element(parameter.items.as_deref(), &owner)?)
        } else {
            self.classify_token(&parameter.type_, &owner)?
        };
        trace!("classified parameter `{owner}` as {class:?}");
        Ok(class)
    }
}
