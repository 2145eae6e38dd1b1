pub mod json;
pub mod php;

pub use json::JsonEmitter;
pub use php::{PhpEmitter, PhpRuntime};

use crate::definition::ClassDefinition;

/// Renders class definitions as text. The builders never produce text themselves.
pub trait Emitter {
    fn emit(
        &mut self,
        class: &ClassDefinition,
        writer: &mut dyn std::io::Write,
    ) -> std::io::Result<()>;
}
