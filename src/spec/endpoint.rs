use crate::spec::{Parameter, SchemaRef};

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Method {
    #[serde(rename = "GET", alias = "get")]
    Get,
    #[serde(rename = "POST", alias = "post")]
    Post,
    #[serde(rename = "PUT", alias = "put")]
    Put,
    #[serde(rename = "PATCH", alias = "patch")]
    Patch,
    #[serde(rename = "DELETE", alias = "delete")]
    Delete,
    #[serde(rename = "HEAD", alias = "head")]
    Head,
    #[serde(rename = "OPTIONS", alias = "options")]
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    pub fn is_post(&self) -> bool {
        *self == Method::Post
    }

    pub fn is_patch(&self) -> bool {
        *self == Method::Patch
    }

    /// Requests with these methods carry a JSON body.
    pub fn has_body(&self) -> bool {
        self.is_post() || self.is_patch()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response bodies keyed by status code, then by content type.
pub type Responses = IndexMap<u16, IndexMap<String, SchemaRef>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub description: Option<String>,
    pub method: Method,
    pub collection: Option<String>,
    #[serde(default)]
    pub path_segments: Vec<String>,
    #[serde(default)]
    pub path_parameters: Vec<Parameter>,
    #[serde(default)]
    pub query_parameters: Vec<Parameter>,
    #[serde(default)]
    pub body_parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: Responses,
}

impl Endpoint {
    /// Creates an endpoint from a `/`-separated path such as `/users/:id`.
    pub fn new(name: impl Into<String>, method: Method, path: &str) -> Self {
        Self {
            name: name.into(),
            description: None,
            method,
            collection: None,
            path_segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            path_parameters: vec![],
            query_parameters: vec![],
            body_parameters: vec![],
            responses: Responses::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_response(
        mut self,
        status: u16,
        content_type: impl Into<String>,
        schema: impl Into<SchemaRef>,
    ) -> Self {
        self.responses
            .entry(status)
            .or_default()
            .insert(content_type.into(), schema.into());
        self
    }

    /// Placeholder names (without the leading `:`) in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.path_segments
            .iter()
            .filter_map(|segment| segment.strip_prefix(':'))
    }
}
