pub mod codegen;
pub mod config;
pub mod definition;
pub mod emit;
pub mod error;
pub mod name;
pub mod spec;
pub mod types;

pub use config::Config;
pub use error::{Error, GenerationError, Result};
pub use spec::ApiSpecification;

pub(crate) use convert_case::{Case, Casing};
