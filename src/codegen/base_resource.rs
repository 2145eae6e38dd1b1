use crate::config::Config;
use crate::definition::{
    ClassDefinition, ClassKind, ParameterDefinition, RuntimeType, TypeRef, Visibility,
};

use log::debug;

pub const BASE_RESOURCE_CLASS_NAME: &str = "BaseResource";

/// The shared class holding the connector every resource talks through.
pub struct BaseResourceBuilder<'a> {
    config: &'a Config,
}

impl<'a> BaseResourceBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(&self) -> ClassDefinition {
        debug!("building `{BASE_RESOURCE_CLASS_NAME}`");
        let mut base = ClassDefinition::new(
            self.config.base_files_namespace(),
            BASE_RESOURCE_CLASS_NAME,
            ClassKind::BaseResource,
        );

        let mut connector =
            ParameterDefinition::new("connector", TypeRef::Runtime(RuntimeType::Connector));
        connector.promoted = Some(Visibility::Protected);
        base.add_constructor_parameter(connector);

        base
    }
}
