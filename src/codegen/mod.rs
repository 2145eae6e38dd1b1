//! Builders turning an [`ApiSpecification`] into class definitions, and the driver
//! running them over a whole specification.

pub mod base_resource;
pub mod dto;
pub mod parameters;
pub mod request;
pub mod response;

pub use base_resource::BaseResourceBuilder;
pub use dto::DtoBuilder;
pub use parameters::{ParameterMaterializer, ParameterNames};
pub use request::{DispatchError, DispatchTable, RequestBuilder};
pub use response::ResponseBuilder;

use crate::config::Config;
use crate::definition::ClassDefinition;
use crate::emit::Emitter;
use crate::error::GenerationError;
use crate::spec::ApiSpecification;

use log::{debug, error, trace};
use std::collections::BTreeMap;

/// Everything one run produced. Classes come in a fixed order: base resource, dtos,
/// responses and requests, each in specification order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Generated {
    pub classes: Vec<ClassDefinition>,
    pub errors: Vec<GenerationError>,
}

impl Generated {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn class(&self, fqn: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|class| class.fqn() == fqn)
    }

    pub fn emit(
        &self,
        emitter: &mut dyn Emitter,
        writer: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        for class in &self.classes {
            emitter.emit(class, writer)?;
        }
        Ok(())
    }
}

pub struct CodeGenerator<'a> {
    spec: &'a ApiSpecification,
    config: &'a Config,
    /// fully-qualified class name -> what it was generated from
    origins: BTreeMap<String, String>,
    generated: Generated,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(spec: &'a ApiSpecification, config: &'a Config) -> Self {
        Self {
            spec,
            config,
            origins: BTreeMap::new(),
            generated: Generated::default(),
        }
    }

    pub fn generate(mut self) -> Generated {
        self.add_base_resource();
        self.add_dtos();
        self.add_responses();
        self.add_requests();
        debug!(
            "generated {} classes, {} failures",
            self.generated.classes.len(),
            self.generated.errors.len()
        );
        self.generated
    }

    fn add_base_resource(&mut self) {
        let base = BaseResourceBuilder::new(self.config).build();
        self.add("base resource", Ok(Some(base)));
    }

    fn add_dtos(&mut self) {
        debug!("adding dtos");
        let spec = self.spec;
        let builder = DtoBuilder::new(self.config, spec);
        for (key, schema) in &spec.schemas {
            trace!("processing schema `{key}`");
            let result = builder.build(key, schema);
            self.add(&format!("schema `{key}`"), result);
        }
    }

    fn add_responses(&mut self) {
        debug!("adding responses");
        let spec = self.spec;
        let builder = ResponseBuilder::new(self.config, spec);
        for (key, schema) in &spec.responses {
            trace!("processing response `{key}`");
            let result = builder.build(key, schema).map(Some);
            self.add(&format!("response `{key}`"), result);
        }
    }

    fn add_requests(&mut self) {
        debug!("adding requests");
        let spec = self.spec;
        let builder = RequestBuilder::new(self.config, spec);
        for endpoint in &spec.endpoints {
            trace!("processing endpoint `{}`", endpoint.name);
            let result = builder.build(endpoint).map(Some);
            self.add(&format!("endpoint `{}`", endpoint.name), result);
        }
    }

    fn add(&mut self, origin: &str, result: Result<Option<ClassDefinition>, GenerationError>) {
        let class = match result {
            Ok(Some(class)) => class,
            Ok(None) => return,
            Err(e) => {
                error!("failed to generate {origin}: {e}");
                self.generated.errors.push(e);
                return;
            }
        };

        let fqn = class.fqn();
        if let Some(first) = self.origins.get(&fqn) {
            let e = GenerationError::NameCollision {
                namespace: class.namespace.clone(),
                name: class.name.clone(),
                first: first.clone(),
                second: origin.to_string(),
            };
            error!("{e}");
            self.generated.errors.push(e);
            return;
        }

        self.origins.insert(fqn, origin.to_string());
        self.generated.classes.push(class);
    }
}
