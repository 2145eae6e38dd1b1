use sdk_gen::codegen::CodeGenerator;
use sdk_gen::emit::{Emitter, JsonEmitter, PhpEmitter};
use sdk_gen::{ApiSpecification, Config, Error};

use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use std::io::Write;

#[derive(Parser)]
struct SdkGen {
    #[clap(subcommand)]
    subcommand: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate SDK classes from an API description and print them to stdout.
    Generate {
        spec_location: std::path::PathBuf,
        #[clap(long)]
        config: Option<std::path::PathBuf>,
        #[clap(long, value_enum, default_value_t = Format::Php)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Php,
    Json,
}

fn generate(
    spec_location: &std::path::Path,
    config: Option<&std::path::Path>,
    format: Format,
) -> sdk_gen::Result<()> {
    let spec = ApiSpecification::from_file(spec_location)?;
    let config = match config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let generated = CodeGenerator::new(&spec, &config).generate();

    let mut emitter: Box<dyn Emitter> = match format {
        Format::Php => Box::new(PhpEmitter::default()),
        Format::Json => Box::new(JsonEmitter::default()),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    generated.emit(emitter.as_mut(), &mut out)?;
    out.flush()?;

    if generated.is_ok() {
        Ok(())
    } else {
        Err(Error::Generation(generated.errors.len()))
    }
}

fn main() {
    pretty_env_logger::init();
    let sdk_gen = SdkGen::parse();

    let result = match sdk_gen.subcommand {
        Command::Generate {
            spec_location,
            config,
            format,
        } => generate(&spec_location, config.as_deref(), format),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
