use sdk_gen::codegen::CodeGenerator;
use sdk_gen::definition::eval::{evaluate, run, EvalError, Scope};
use sdk_gen::definition::{ClassDefinition, Stmt, TypeRef};
use sdk_gen::emit::{JsonEmitter, PhpEmitter};
use sdk_gen::{ApiSpecification, Config, GenerationError};

use serde_json::json;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn petstore() -> ApiSpecification {
    ApiSpecification::from_yaml(PETSTORE).unwrap()
}

fn config() -> Config {
    Config::from_yaml("ignored_body_params: [token]").unwrap()
}

/// Evaluates the status dispatch of a generated `createDtoFromResponse`.
fn dispatch(request: &ClassDefinition, status: u16) -> Result<serde_json::Value, EvalError> {
    let method = request.method("createDtoFromResponse").unwrap();
    let value = method
        .body
        .iter()
        .find_map(|stmt| match stmt {
            Stmt::Assign { variable, value } if variable == "responseCls" => Some(value),
            _ => None,
        })
        .unwrap();
    evaluate(value, &Scope::new().with_variable("status", status))
}

#[test]
fn generates_every_artifact_in_order() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();
    assert!(generated.is_ok(), "{:?}", generated.errors);

    let fqns: Vec<_> = generated.classes.iter().map(ClassDefinition::fqn).collect();
    assert_eq!(
        fqns,
        [
            "App\\Sdk\\BaseResource",
            "App\\Sdk\\Dto\\Pet",
            "App\\Sdk\\Dto\\Owner",
            "App\\Sdk\\Responses\\PetPage",
            "App\\Sdk\\Responses\\PetDetails",
            "App\\Sdk\\Responses\\ApiError",
            "App\\Sdk\\Requests\\Pets\\ListPets",
            "App\\Sdk\\Requests\\Pets\\CreatePet",
            "App\\Sdk\\Requests\\Pets\\GetPet",
            "App\\Sdk\\Requests\\Resource\\HealthCheck",
        ]
    );
}

#[test]
fn dto_references_other_dtos() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();

    let pet = generated.class("App\\Sdk\\Dto\\Pet").unwrap();
    assert_eq!(pet.comment, ["A pet in the store."]);
    assert_eq!(pet.constructor_parameter_names(), ["id", "name", "tag", "owner"]);
    let owner = &pet.constructor_parameters()[3];
    assert_eq!(owner.ty, TypeRef::Class("App\\Sdk\\Dto\\Owner".into()));
    assert!(owner.nullable);
}

#[test]
fn response_lists_complex_array_types() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();

    let page = generated.class("App\\Sdk\\Responses\\PetPage").unwrap();
    let types = page.property("complexArrayTypes").unwrap();
    assert!(types.is_static);
    let value = evaluate(types.value.as_ref().unwrap(), &Scope::new()).unwrap();
    assert_eq!(value, json!({"items": "App\\Sdk\\Dto\\Pet"}));

    let details = generated.class("App\\Sdk\\Responses\\PetDetails").unwrap();
    assert!(details.property("complexArrayTypes").is_none());
}

#[test]
fn request_resolves_path_from_properties() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();

    let get = generated.class("App\\Sdk\\Requests\\Pets\\GetPet").unwrap();
    assert_eq!(get.constructor_parameter_names(), ["petId"]);
    let path = run(
        &get.method("resolveEndpoint").unwrap().body,
        &Scope::new().with_property("petId", 7),
    )
    .unwrap();
    assert_eq!(path, json!("/pets/7"));

    let health = generated
        .class("App\\Sdk\\Requests\\Resource\\HealthCheck")
        .unwrap();
    let path = run(&health.method("resolveEndpoint").unwrap().body, &Scope::new()).unwrap();
    assert_eq!(path, json!("/health"));
    assert!(health.constructor.is_none());
}

#[test]
fn request_dispatches_on_status() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();

    let list = generated.class("App\\Sdk\\Requests\\Pets\\ListPets").unwrap();
    assert_eq!(
        dispatch(list, 200).unwrap(),
        json!("App\\Sdk\\Responses\\PetPage")
    );
    assert_eq!(
        dispatch(list, 500).unwrap(),
        json!("App\\Sdk\\Responses\\ApiError")
    );
    assert_eq!(
        dispatch(list, 204),
        Err(EvalError::Thrown("unhandled response status: 204".into()))
    );
    assert_eq!(
        list.method("createDtoFromResponse").unwrap().return_type,
        Some(TypeRef::Union(vec![
            TypeRef::Class("App\\Sdk\\Responses\\PetPage".into()),
            TypeRef::Class("App\\Sdk\\Responses\\ApiError".into()),
        ]))
    );

    // only the first content type of a status counts
    let create = generated.class("App\\Sdk\\Requests\\Pets\\CreatePet").unwrap();
    assert_eq!(
        dispatch(create, 201).unwrap(),
        json!("App\\Sdk\\Responses\\PetDetails")
    );

    let health = generated
        .class("App\\Sdk\\Requests\\Resource\\HealthCheck")
        .unwrap();
    assert_eq!(health.method("createDtoFromResponse").unwrap().return_type, None);
    assert!(matches!(dispatch(health, 200), Err(EvalError::Thrown(_))));
}

#[test]
fn default_payloads_drop_nulls_and_ignored_params() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();

    let list = generated.class("App\\Sdk\\Requests\\Pets\\ListPets").unwrap();
    let query = run(
        &list.method("defaultQuery").unwrap().body,
        &Scope::new()
            .with_property("limit", 10)
            .with_property("page", serde_json::Value::Null),
    )
    .unwrap();
    assert_eq!(query, json!({"limit": 10}));
    assert!(list.method("defaultBody").is_none());

    let create = generated.class("App\\Sdk\\Requests\\Pets\\CreatePet").unwrap();
    assert_eq!(create.constructor_parameter_names(), ["name", "tag"]);
    let body = run(
        &create.method("defaultBody").unwrap().body,
        &Scope::new()
            .with_property("name", "Rex")
            .with_property("tag", serde_json::Value::Null),
    )
    .unwrap();
    assert_eq!(body, json!({"name": "Rex"}));
}

#[test]
fn generation_is_deterministic() {
    let spec = petstore();
    let config = config();
    let first = CodeGenerator::new(&spec, &config).generate();
    let second = CodeGenerator::new(&petstore(), &config).generate();
    assert_eq!(first, second);

    let mut first_json = Vec::new();
    first.emit(&mut JsonEmitter, &mut first_json).unwrap();
    let mut second_json = Vec::new();
    second.emit(&mut JsonEmitter, &mut second_json).unwrap();
    assert_eq!(first_json, second_json);

    let mut php = Vec::new();
    first.emit(&mut PhpEmitter::default(), &mut php).unwrap();
    let php = String::from_utf8(php).unwrap();
    assert_eq!(php.matches("<?php").count(), first.classes.len());
}

#[test]
fn custom_namespaces_flow_into_every_class() {
    let spec = petstore();
    let config = Config::from_yaml(
        r#"
namespace: Acme\Petstore
dto_namespace_suffix: Data
request_namespace_suffix: ""
"#,
    )
    .unwrap();
    let generated = CodeGenerator::new(&spec, &config).generate();
    assert!(generated.is_ok());

    assert!(generated.class("Acme\\Petstore\\BaseResource").is_some());
    assert!(generated.class("Acme\\Petstore\\Data\\Pet").is_some());
    assert!(generated.class("Acme\\Petstore\\Pets\\ListPets").is_some());
    // token is not ignored here
    let create = generated.class("Acme\\Petstore\\Pets\\CreatePet").unwrap();
    assert_eq!(create.constructor_parameter_names(), ["name", "tag", "token"]);
}

#[test]
fn broken_endpoint_does_not_stop_the_run() {
    let spec = ApiSpecification::from_yaml(
        r#"
endpoints:
  - name: Delete pet
    method: DELETE
    collection: pets
    path_segments: [pets, ":id"]
  - name: Ping
    method: GET
    path_segments: [ping]
"#,
    )
    .unwrap();
    let config = Config::default();
    let generated = CodeGenerator::new(&spec, &config).generate();

    assert_eq!(
        generated.errors,
        [GenerationError::PathParameterMismatch {
            endpoint: "Delete pet".into(),
            placeholder: ":id".into(),
        }]
    );
    assert!(generated
        .class("App\\Sdk\\Requests\\Resource\\Ping")
        .is_some());
}

#[test]
fn emits_php_source() {
    let spec = petstore();
    let config = config();
    let generated = CodeGenerator::new(&spec, &config).generate();
    let get = generated.class("App\\Sdk\\Requests\\Pets\\GetPet").unwrap();
    let php = PhpEmitter::default().render(get).unwrap();

    assert!(php.contains("namespace App\\Sdk\\Requests\\Pets;"));
    assert!(php.contains("    public function resolveEndpoint(): string\n"));
    assert!(php.contains("        return \"/pets/{$this->petId}\";"));
    assert!(php.contains("        protected readonly int $petId,"));
    assert!(php.contains(
        "    public function createDtoFromResponse(\\Saloon\\Http\\Response $response): \\App\\Sdk\\Responses\\PetDetails|\\App\\Sdk\\Responses\\ApiError\n"
    ));
}

#[test]
fn misspelled_response_is_reported() {
    let spec = ApiSpecification::from_yaml(
        r#"
endpoints:
  - name: List pets
    method: GET
    collection: pets
    path_segments: [pets]
    responses:
      200:
        application/json: PetPag
responses:
  PetPage:
    type: object
"#,
    )
    .unwrap();
    let config = Config::default();
    let generated = CodeGenerator::new(&spec, &config).generate();

    assert_eq!(
        generated.errors,
        [GenerationError::UnresolvedType {
            token: "PetPag".into(),
            owner: "List pets.200".into(),
        }]
    );
    assert!(generated.class("App\\Sdk\\Responses\\PetPage").is_some());
    assert!(generated
        .class("App\\Sdk\\Requests\\Pets\\ListPets")
        .is_none());
}
