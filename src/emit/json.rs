use crate::definition::ClassDefinition;
use crate::emit::Emitter;

/// Dumps each definition as a pretty-printed JSON document.
#[derive(Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(
        &mut self,
        class: &ClassDefinition,
        writer: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, class)?;
        writeln!(writer)
    }
}
