use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single generated artifact. The driver records these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("unresolvable type `{token}` in `{owner}`")]
    UnresolvedType { token: String, owner: String },

    #[error("class `{namespace}\\{name}` generated for `{second}` collides with the one generated for `{first}`")]
    NameCollision {
        namespace: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("path placeholder `{placeholder}` of endpoint `{endpoint}` has no matching path parameter")]
    PathParameterMismatch {
        endpoint: String,
        placeholder: String,
    },

    #[error("parameters `{first}` and `{second}` of `{owner}` both become `${name}`")]
    DuplicateParameter {
        owner: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("response {status} of endpoint `{endpoint}` uses an anonymous schema")]
    AnonymousResponse { endpoint: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0} artifact(s) failed to generate")]
    Generation(usize),
}
