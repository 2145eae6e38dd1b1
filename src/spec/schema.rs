use crate::spec::Parameter;

use indexmap::IndexMap;
use serde::{de, Deserialize};
use serde_yaml::Value;
use std::borrow::Cow;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Schema {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub description: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Parameter>,
    pub items: Option<Box<Schema>>,
}

impl Schema {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_: type_.into(),
            ..Default::default()
        }
    }

    /// An unnamed schema holding only a type token, like the `items` of an array.
    pub fn of_type(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: Parameter) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn is_of_type(&self, type_: impl AsRef<str>) -> bool {
        self.type_() == type_.as_ref()
    }

    pub fn is_object(&self) -> bool {
        self.is_of_type("object")
    }

    pub fn is_array(&self) -> bool {
        self.is_of_type("array")
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns this schema with a name filled in if it has none. Named schemas are
    /// borrowed unchanged, so calling it again on the result is a no-op.
    pub fn ensure_named(&self, fallback: impl FnOnce() -> String) -> Cow<'_, Schema> {
        if self.name.is_some() {
            Cow::Borrowed(self)
        } else {
            let mut named = self.clone();
            named.name = Some(fallback());
            Cow::Owned(named)
        }
    }
}

/// A response body schema, either by name or spelled out inline.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    Reference(String),
    Inline(Box<Schema>),
}

impl SchemaRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaRef::Reference(name) => Some(name),
            SchemaRef::Inline(schema) => schema.name(),
        }
    }
}

impl From<Schema> for SchemaRef {
    fn from(schema: Schema) -> Self {
        SchemaRef::Inline(Box::new(schema))
    }
}

impl From<&str> for SchemaRef {
    fn from(name: &str) -> Self {
        SchemaRef::Reference(name.to_string())
    }
}

impl<'de> de::Deserialize<'de> for SchemaRef {
    fn deserialize<D>(deserializer: D) -> Result<SchemaRef, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let v: Value = de::Deserialize::deserialize(deserializer)?;

        match v {
            Value::String(name) => Ok(SchemaRef::Reference(name)),
            v @ Value::Mapping(_) => serde_yaml::from_value(v)
                .map(|schema: Schema| SchemaRef::Inline(Box::new(schema)))
                .map_err(|e| de::Error::custom(e.to_string())),
            v => Err(de::Error::custom(format!(
                "invalid schema reference `{:?}`",
                v
            ))),
        }
    }
}
