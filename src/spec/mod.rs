pub mod endpoint;
pub mod parameter;
pub mod schema;

pub use endpoint::{Endpoint, Method};
pub use parameter::Parameter;
pub use schema::{Schema, SchemaRef};

use crate::error::{Error, Result};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Deserialize;
use std::path::Path;

/// Normalized description of an HTTP API, as handed over by a spec loader.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ApiSpecification {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub responses: IndexMap<String, Schema>,
}

impl ApiSpecification {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: ApiSpecification = serde_yaml::from_str(yaml)?;
        Ok(spec.with_names())
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let spec: ApiSpecification = serde_yaml::from_reader(reader)?;
        Ok(spec.with_names())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading specification from `{}`", path.display());
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Fills in names the document leaves implicit: map keys name their schemas and
    /// property keys name their parameters.
    fn with_names(mut self) -> Self {
        for (key, schema) in self.schemas.iter_mut().chain(self.responses.iter_mut()) {
            if schema.name.is_none() {
                trace!("naming schema `{key}` after its key");
                schema.name = Some(key.clone());
            }
            name_properties(schema);
        }
        for endpoint in &mut self.endpoints {
            for response in endpoint.responses.values_mut() {
                for schema_ref in response.values_mut() {
                    if let SchemaRef::Inline(schema) = schema_ref {
                        name_properties(schema);
                    }
                }
            }
        }
        self
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Response schema by its name, falling back to its key when unnamed.
    pub fn response(&self, name: &str) -> Option<&Schema> {
        self.responses
            .iter()
            .find(|(key, schema)| schema.name().unwrap_or(key.as_str()) == name)
            .map(|(_, schema)| schema)
    }
}

fn name_properties(schema: &mut Schema) {
    for (key, property) in schema.properties.iter_mut() {
        if property.name.is_empty() {
            property.name = key.clone();
        }
        if let Some(items) = property.items.as_deref_mut() {
            name_properties(items);
        }
    }
    if let Some(items) = schema.items.as_deref_mut() {
        name_properties(items);
    }
}
