use crate::codegen::parameters::{ParameterMaterializer, ParameterNames};
use crate::config::Config;
use crate::definition::{Capability, ClassDefinition, ClassKind};
use crate::error::GenerationError;
use crate::name::{dto_class_name, wrap_long_lines};
use crate::spec::{ApiSpecification, Schema};
use crate::types::TypeClassifier;

use log::debug;

pub struct DtoBuilder<'a> {
    config: &'a Config,
    classifier: TypeClassifier<'a>,
}

impl<'a> DtoBuilder<'a> {
    pub fn new(config: &'a Config, spec: &'a ApiSpecification) -> Self {
        Self {
            config,
            classifier: TypeClassifier::new(spec),
        }
    }

    /// Builds the data class of an object schema. Primitive and array schemas have
    /// none and yield `Ok(None)`.
    pub fn build(
        &self,
        key: &str,
        schema: &Schema,
    ) -> Result<Option<ClassDefinition>, GenerationError> {
        let schema = schema.ensure_named(|| key.to_string());
        let name = schema.name().unwrap_or(key);

        let class = self.classifier.classify_schema(&schema, name)?;
        if !class.is_object() {
            debug!("skipping dto for {class:?} schema `{name}`");
            return Ok(None);
        }
        debug!("building dto `{name}`");

        let namespace = self.config.dto_namespace();
        let mut dto = ClassDefinition::new(&namespace, dto_class_name(name), ClassKind::Dto);
        dto.is_final = true;
        if let Some(description) = &schema.description {
            dto.comment = wrap_long_lines(description, 100);
        }
        dto.add_capability(Capability::Deserializable);

        let materializer = ParameterMaterializer::new(&self.classifier, namespace);
        ParameterNames::new().claim_all(schema.properties.values(), name)?;
        for property in schema.properties.values() {
            dto.add_constructor_parameter(materializer.materialize(property, name)?);
        }

        Ok(Some(dto))
    }
}
