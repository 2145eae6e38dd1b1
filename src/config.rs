use crate::error::{Error, Result};
use crate::name::join_namespace;

use serde::Deserialize;
use std::path::Path;

/// Settings threaded through every builder. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub namespace: String,
    pub dto_namespace_suffix: String,
    pub request_namespace_suffix: String,
    pub response_namespace_suffix: String,
    /// Resource used for endpoints without a collection.
    pub fallback_resource_name: String,
    pub ignored_body_params: Vec<String>,
    pub ignored_query_params: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "App\\Sdk".into(),
            dto_namespace_suffix: "Dto".into(),
            request_namespace_suffix: "Requests".into(),
            response_namespace_suffix: "Responses".into(),
            fallback_resource_name: "Resource".into(),
            ignored_body_params: vec![],
            ignored_query_params: vec![],
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn base_files_namespace(&self) -> String {
        join_namespace(&self.namespace, "")
    }

    pub fn dto_namespace(&self) -> String {
        join_namespace(&self.namespace, &self.dto_namespace_suffix)
    }

    pub fn response_namespace(&self) -> String {
        join_namespace(&self.namespace, &self.response_namespace_suffix)
    }

    pub fn request_namespace(&self, resource: &str) -> String {
        join_namespace(
            &join_namespace(&self.namespace, &self.request_namespace_suffix),
            resource,
        )
    }

    pub fn is_ignored_body_param(&self, name: &str) -> bool {
        self.ignored_body_params.iter().any(|ignored| ignored == name)
    }

    pub fn is_ignored_query_param(&self, name: &str) -> bool {
        self.ignored_query_params.iter().any(|ignored| ignored == name)
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn namespaces() {
        let config = Config::default();
        assert_eq!(config.base_files_namespace(), "App\\Sdk");
        assert_eq!(config.dto_namespace(), "App\\Sdk\\Dto");
        assert_eq!(config.response_namespace(), "App\\Sdk\\Responses");
        assert_eq!(config.request_namespace("Pets"), "App\\Sdk\\Requests\\Pets");
    }

    #[test]
    fn empty_suffix_leaves_no_separator() {
        let config = Config {
            request_namespace_suffix: "".into(),
            dto_namespace_suffix: "".into(),
            ..Default::default()
        };
        assert_eq!(config.dto_namespace(), "App\\Sdk");
        assert_eq!(config.request_namespace("Pets"), "App\\Sdk\\Pets");
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = Config::from_yaml(
            "namespace: Acme\\Client\nignored_body_params: [secret]\n",
        )
        .unwrap();
        assert_eq!(config.namespace, "Acme\\Client");
        assert_eq!(config.dto_namespace_suffix, "Dto");
        assert!(config.is_ignored_body_param("secret"));
        assert!(!config.is_ignored_query_param("secret"));
    }
}
