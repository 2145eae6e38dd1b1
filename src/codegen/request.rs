use crate::codegen::parameters::{ParameterMaterializer, ParameterNames};
use crate::config::Config;
use crate::definition::{
    Capability, ClassDefinition, ClassKind, Expr, MatchArm, MethodDefinition,
    ParameterDefinition, Part, PropertyDefinition, RuntimeType, Stmt, TypeRef, Visibility,
};
use crate::error::GenerationError;
use crate::name::{
    request_class_name, resource_class_name, response_class_name, safe_variable_name,
    wrap_long_lines,
};
use crate::spec::{ApiSpecification, Endpoint, Parameter};
use crate::types::{SimpleType, TypeClassifier};

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

pub const RESOLVE_ENDPOINT: &str = "resolveEndpoint";
pub const CREATE_DTO_FROM_RESPONSE: &str = "createDtoFromResponse";
pub const DEFAULT_BODY: &str = "defaultBody";
pub const DEFAULT_QUERY: &str = "defaultQuery";

const UNHANDLED_STATUS: &str = "unhandled response status: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unhandled response status: {0}")]
    UnhandledStatus(u16),
}

/// Status codes grouped by the response class they deserialize into, in order of first
/// appearance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    groups: IndexMap<String, Vec<u16>>,
}

impl DispatchTable {
    /// Only the first content type of each status is considered.
    pub fn from_endpoint(endpoint: &Endpoint) -> Result<Self, GenerationError> {
        let mut table = DispatchTable::default();
        for (status, content) in &endpoint.responses {
            let Some((content_type, schema)) = content.first() else {
                continue;
            };
            let name = schema
                .name()
                .ok_or_else(|| GenerationError::AnonymousResponse {
                    endpoint: endpoint.name.clone(),
                    status: *status,
                })?;
            trace!("{status} ({content_type}) of `{}` -> `{name}`", endpoint.name);
            table.insert(response_class_name(name), *status);
        }
        Ok(table)
    }

    pub fn insert(&mut self, class_name: impl Into<String>, status: u16) {
        let statuses = self.groups.entry(class_name.into()).or_default();
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[u16])> {
        self.groups
            .iter()
            .map(|(class, statuses)| (class.as_str(), statuses.as_slice()))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Response class for `status`, as the generated dispatcher selects it.
    pub fn resolve(&self, status: u16) -> Result<&str, DispatchError> {
        self.groups()
            .find(|(_, statuses)| statuses.contains(&status))
            .map(|(class, _)| class)
            .ok_or(DispatchError::UnhandledStatus(status))
    }
}

pub struct RequestBuilder<'a> {
    config: &'a Config,
    spec: &'a ApiSpecification,
    classifier: TypeClassifier<'a>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a Config, spec: &'a ApiSpecification) -> Self {
        Self {
            config,
            spec,
            classifier: TypeClassifier::new(spec),
        }
    }

    pub fn resource_name(&self, endpoint: &Endpoint) -> String {
        let collection = endpoint
            .collection
            .as_deref()
            .filter(|collection| !collection.is_empty())
            .unwrap_or(&self.config.fallback_resource_name);
        resource_class_name(collection)
    }

    pub fn build(&self, endpoint: &Endpoint) -> Result<ClassDefinition, GenerationError> {
        let resource = self.resource_name(endpoint);
        let name = request_class_name(&endpoint.name);
        debug!("building request `{resource}\\{name}` for {} endpoint", endpoint.method);

        let mut request = ClassDefinition::new(
            self.config.request_namespace(&resource),
            name,
            ClassKind::Request,
        );
        request.comment.push(endpoint.name.clone());
        if let Some(description) = endpoint.description.as_deref().filter(|d| !d.is_empty()) {
            request.comment.push(String::new());
            request.comment.extend(wrap_long_lines(description, 100));
        }

        // TODO: take the body format from the endpoint once non-JSON bodies are modelled
        if endpoint.method.has_body() {
            request.add_capability(Capability::HasBody);
            request.add_capability(Capability::JsonBody);
        }

        request.properties.push(PropertyDefinition {
            name: "method".into(),
            ty: TypeRef::Runtime(RuntimeType::HttpMethod),
            visibility: Visibility::Protected,
            is_static: false,
            value: Some(Expr::EnumCase {
                ty: TypeRef::Runtime(RuntimeType::HttpMethod),
                case: endpoint.method.as_str().into(),
            }),
        });

        request.methods.push(self.resolve_endpoint(endpoint)?);

        let table = DispatchTable::from_endpoint(endpoint)?;
        self.check_response_references(endpoint)?;
        request.methods.push(self.create_dto_from_response(&table));

        self.add_constructor(endpoint, &mut request)?;

        Ok(request)
    }

    /// Every response class the dispatcher names must be one that gets generated.
    fn check_response_references(&self, endpoint: &Endpoint) -> Result<(), GenerationError> {
        for (status, content) in &endpoint.responses {
            let Some(name) = content.first().and_then(|(_, schema)| schema.name()) else {
                continue;
            };
            if self.spec.response(name).is_none() {
                return Err(GenerationError::UnresolvedType {
                    token: name.to_string(),
                    owner: format!("{}.{status}", endpoint.name),
                });
            }
        }
        Ok(())
    }

    fn resolve_endpoint(&self, endpoint: &Endpoint) -> Result<MethodDefinition, GenerationError> {
        let mut parts = vec![];
        let mut text = String::new();
        for segment in &endpoint.path_segments {
            text.push('/');
            match segment.strip_prefix(':') {
                Some(placeholder) => {
                    let variable = safe_variable_name(placeholder);
                    let declared = endpoint
                        .path_parameters
                        .iter()
                        .any(|parameter| safe_variable_name(&parameter.name) == variable);
                    if !declared {
                        return Err(GenerationError::PathParameterMismatch {
                            endpoint: endpoint.name.clone(),
                            placeholder: segment.clone(),
                        });
                    }
                    parts.push(Part::Text(std::mem::take(&mut text)));
                    parts.push(Part::Expr(Expr::property(variable)));
                }
                None => text.push_str(segment),
            }
        }
        if endpoint.path_segments.is_empty() {
            text.push('/');
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        let mut method = MethodDefinition::new(RESOLVE_ENDPOINT, TypeRef::Simple(SimpleType::String));
        method.body.push(Stmt::Return {
            value: Expr::Interpolate(parts),
        });
        Ok(method)
    }

    fn create_dto_from_response(&self, table: &DispatchTable) -> MethodDefinition {
        let namespace = self.config.response_namespace();
        let mut response_types: Vec<_> = table
            .class_names()
            .map(|class| TypeRef::class(&namespace, class))
            .collect();

        let arms = table
            .groups()
            .map(|(class, statuses)| MatchArm {
                patterns: statuses.iter().map(|status| Expr::literal(*status)).collect(),
                value: Expr::ClassRef(TypeRef::class(&namespace, class)),
            })
            .collect();
        let unhandled = Expr::Throw(Box::new(Expr::Interpolate(vec![
            Part::Text(UNHANDLED_STATUS.into()),
            Part::Expr(Expr::variable("status")),
        ])));

        let response = Expr::variable("response");
        let mut method = MethodDefinition {
            name: CREATE_DTO_FROM_RESPONSE.into(),
            visibility: Visibility::Public,
            parameters: vec![ParameterDefinition::new(
                "response",
                TypeRef::Runtime(RuntimeType::HttpResponse),
            )],
            return_type: match response_types.len() {
                0 => None,
                1 => response_types.pop(),
                _ => Some(TypeRef::Union(response_types)),
            },
            body: vec![],
        };
        method.body.push(Stmt::Assign {
            variable: "status".into(),
            value: Expr::call(response.clone(), "status", vec![]),
        });
        method.body.push(Stmt::Assign {
            variable: "responseCls".into(),
            value: Expr::Match {
                subject: Box::new(Expr::variable("status")),
                arms,
                fallback: Box::new(unhandled),
            },
        });
        method.body.push(Stmt::Return {
            value: Expr::StaticCall {
                class: Box::new(Expr::variable("responseCls")),
                method: "deserialize".into(),
                args: vec![
                    Expr::call(response, "json", vec![]),
                    Expr::variable("responseCls"),
                ],
            },
        });
        method
    }

    /// Path parameters first, then body parameters, then query parameters, whatever
    /// their order in the specification.
    fn add_constructor(
        &self,
        endpoint: &Endpoint,
        request: &mut ClassDefinition,
    ) -> Result<(), GenerationError> {
        let materializer = ParameterMaterializer::new(&self.classifier, self.config.dto_namespace())
            .with_visibility(Visibility::Protected);
        let owner = endpoint.name.as_str();
        let mut names = ParameterNames::new();

        names.claim_all(&endpoint.path_parameters, owner)?;
        for parameter in materializer.materialize_all(&endpoint.path_parameters, owner)? {
            request.add_constructor_parameter(parameter);
        }

        let body: Vec<&Parameter> = endpoint
            .body_parameters
            .iter()
            .filter(|parameter| !self.config.is_ignored_body_param(&parameter.name))
            .collect();
        names.claim_all(body.iter().copied(), owner)?;
        for parameter in materializer.materialize_all(body.iter().copied(), owner)? {
            request.add_constructor_parameter(parameter);
        }
        if !body.is_empty() {
            request.methods.push(ParameterMaterializer::default_values_method(
                DEFAULT_BODY,
                body.iter().copied(),
            ));
        }

        let query: Vec<&Parameter> = endpoint
            .query_parameters
            .iter()
            .filter(|parameter| !self.config.is_ignored_query_param(&parameter.name))
            .collect();
        names.claim_all(query.iter().copied(), owner)?;
        for parameter in materializer.materialize_all(query.iter().copied(), owner)? {
            request.add_constructor_parameter(parameter);
        }
        if !query.is_empty() {
            request.methods.push(ParameterMaterializer::default_values_method(
                DEFAULT_QUERY,
                query.iter().copied(),
            ));
        }

        Ok(())
    }
}
