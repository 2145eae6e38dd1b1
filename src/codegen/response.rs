use crate::codegen::parameters::{ParameterMaterializer, ParameterNames};
use crate::config::Config;
use crate::definition::{
    Capability, ClassDefinition, ClassKind, Expr, PropertyDefinition, TypeRef, Visibility,
};
use crate::error::GenerationError;
use crate::name::{dto_class_name, response_class_name, safe_variable_name};
use crate::spec::{ApiSpecification, Parameter, Schema};
use crate::types::{SimpleType, TypeClass, TypeClassifier};

use indexmap::IndexMap;
use log::{debug, trace};

/// Static property telling the hydration helper which properties hold lists of objects.
pub const COMPLEX_ARRAY_TYPES: &str = "complexArrayTypes";

pub struct ResponseBuilder<'a> {
    config: &'a Config,
    classifier: TypeClassifier<'a>,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(config: &'a Config, spec: &'a ApiSpecification) -> Self {
        Self {
            config,
            classifier: TypeClassifier::new(spec),
        }
    }

    pub fn build(&self, key: &str, schema: &Schema) -> Result<ClassDefinition, GenerationError> {
        let schema = schema.ensure_named(|| key.to_string());
        let name = schema.name().unwrap_or(key);
        debug!("building response `{name}`");

        let mut response = ClassDefinition::new(
            self.config.response_namespace(),
            response_class_name(name),
            ClassKind::Response,
        );
        response.is_final = true;
        response.add_capability(Capability::Deserializable);
        response.add_capability(Capability::WithResponse);

        let dto_namespace = self.config.dto_namespace();
        let materializer = ParameterMaterializer::new(&self.classifier, &dto_namespace);
        // property name -> element dto class name
        let mut complex_array_types: IndexMap<String, String> = IndexMap::new();

        if let TypeClass::Array(_) = self.classifier.classify_schema(&schema, name)? {
            // a list body becomes a single property named after the schema
            let variable = safe_variable_name(name);
            let items = schema
                .items
                .as_deref()
                .map(|items| Box::new(items.ensure_named(|| variable.clone()).into_owned()));
            let property = Parameter {
                name: name.to_string(),
                type_: SimpleType::Array.to_string(),
                description: schema.description.clone(),
                items,
                ..Default::default()
            };
            let (parameter, class) = materializer.materialize_classified(&property, name)?;
            if let Some(element) = class.complex_element() {
                complex_array_types.insert(parameter.name.clone(), dto_class_name(element));
            }
            response.add_constructor_parameter(parameter);
        } else {
            ParameterNames::new().claim_all(schema.properties.values(), name)?;
            for (property_name, property) in &schema.properties {
                let (parameter, class) = materializer.materialize_classified(property, name)?;
                if let Some(element) = class.complex_element() {
                    trace!("`{property_name}` of `{name}` is a list of `{element}`");
                    complex_array_types
                        .insert(safe_variable_name(property_name), dto_class_name(element));
                }
                response.add_constructor_parameter(parameter);
            }
        }

        if !complex_array_types.is_empty() {
            let entries = complex_array_types
                .into_iter()
                .map(|(property, element)| {
                    (
                        property,
                        Expr::ClassRef(TypeRef::class(&dto_namespace, &element)),
                    )
                })
                .collect();
            response.properties.push(PropertyDefinition {
                name: COMPLEX_ARRAY_TYPES.into(),
                ty: TypeRef::Simple(SimpleType::Array),
                visibility: Visibility::Protected,
                is_static: true,
                value: Some(Expr::Map(entries)),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::definition::eval::{evaluate, Scope};

    use serde_json::json;

    fn spec() -> ApiSpecification {
        let mut spec = ApiSpecification::default();
        spec.schemas.insert(
            "Widget".into(),
            Schema::new("Widget", "object").with_property(Parameter::new("id", "integer")),
        );
        spec.responses.insert(
            "Widgets".into(),
            Schema::new("Widgets", "array").with_items(Schema::of_type("Widget")),
        );
        spec.responses.insert(
            "WidgetPage".into(),
            Schema::new("WidgetPage", "object")
                .with_property(
                    Parameter::new("items", "array").with_items(Schema::of_type("Widget")),
                )
                .with_property(
                    Parameter::new("labels", "array").with_items(Schema::of_type("string")),
                )
                .with_property(Parameter::new("next_cursor", "string").nullable()),
        );
        spec
    }

    fn complex_array_types(response: &ClassDefinition) -> Option<serde_json::Value> {
        let property = response.property(COMPLEX_ARRAY_TYPES)?;
        let value = property.value.as_ref()?;
        evaluate(value, &Scope::new()).ok()
    }

    #[test]
    fn array_response_gets_single_list_property() {
        let spec = spec();
        let config = Config::default();
        let builder = ResponseBuilder::new(&config, &spec);

        let response = builder.build("Widgets", &spec.responses["Widgets"]).unwrap();
        assert_eq!(response.name, "Widgets");
        assert_eq!(response.namespace, "App\\Sdk\\Responses");
        assert_eq!(response.constructor_parameter_names(), ["widgets"]);
        assert_eq!(
            response.constructor_parameters()[0].ty,
            TypeRef::list_of(TypeRef::Class("App\\Sdk\\Dto\\Widget".into()))
        );
        assert_eq!(
            complex_array_types(&response),
            Some(json!({ "widgets": "App\\Sdk\\Dto\\Widget" }))
        );

        let property = response.property(COMPLEX_ARRAY_TYPES).unwrap();
        assert!(property.is_static);
        assert_eq!(property.visibility, Visibility::Protected);
    }

    #[test]
    fn object_response_records_only_lists_of_objects() {
        let spec = spec();
        let config = Config::default();
        let builder = ResponseBuilder::new(&config, &spec);

        let response = builder
            .build("WidgetPage", &spec.responses["WidgetPage"])
            .unwrap();
        assert_eq!(
            response.constructor_parameter_names(),
            ["items", "labels", "nextCursor"]
        );
        assert_eq!(
            complex_array_types(&response),
            Some(json!({ "items": "App\\Sdk\\Dto\\Widget" }))
        );
        assert!(response.has_capability(Capability::Deserializable));
    }

    #[test]
    fn no_metadata_without_lists_of_objects() {
        let spec = spec();
        let config = Config::default();
        let builder = ResponseBuilder::new(&config, &spec);

        let plain = Schema::new("Status", "object").with_property(Parameter::new("ok", "boolean"));
        let response = builder.build("Status", &plain).unwrap();
        assert!(response.property(COMPLEX_ARRAY_TYPES).is_none());
        assert_eq!(response.constructor_parameter_names(), ["ok"]);
    }

    #[test]
    fn building_leaves_anonymous_items_untouched() {
        let spec = spec();
        let config = Config::default();
        let builder = ResponseBuilder::new(&config, &spec);

        let schema = &spec.responses["Widgets"];
        builder.build("Widgets", schema).unwrap();
        assert_eq!(schema.items.as_ref().unwrap().name(), None);
    }

    #[test]
    fn properties_resolving_to_one_name_fail_the_response() {
        let spec = spec();
        let config = Config::default();
        let builder = ResponseBuilder::new(&config, &spec);
        let schema = Schema::new("Cursor", "object")
            .with_property(Parameter::new("next-cursor", "string"))
            .with_property(Parameter::new("next_cursor", "string"));
        assert!(matches!(
            builder.build("Cursor", &schema),
            Err(GenerationError::DuplicateParameter { name, .. }) if name == "nextCursor"
        ));
    }
}
