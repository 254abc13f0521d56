//! Compile Schema Markdown to a JSON type model, or validate JSON against a schema.
//!
//! Usage:
//!   schema-markdown compile [SCHEMA ...] [-o OUTPUT] [-t TITLE] [--compact]
//!   schema-markdown validate -s SCHEMA [-s SCHEMA ...] -t TYPE [INPUT.json ...]
//!
//! Schema paths may be files or directories (every `.scm` file below, sorted). With no
//! schema paths `compile` reads stdin; with no inputs `validate` reads stdin.
//! Errors go to stderr and the exit code is 1. `RUST_LOG` controls logging.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use schema_markdown::dump::{dump_type_model, dump_value, DumpStyle};
use schema_markdown::parser::DEFAULT_EXTENSION;
use schema_markdown::{validate_type, SchemaMarkdownParser, TypeModel, Value};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "schema-markdown", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse schema files and write the JSON type model.
    Compile(CompileArgs),
    /// Validate JSON documents against a schema type.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Schema files or directories (stdin when omitted).
    paths: Vec<PathBuf>,
    /// Output file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Type model title.
    #[arg(short, long, default_value = "Schema Markdown")]
    title: String,
    /// Write compact JSON.
    #[arg(long)]
    compact: bool,
    /// Schema file extension used for directories.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Schema files or directories.
    #[arg(short, long = "schema", required = true)]
    schemas: Vec<PathBuf>,
    /// Type to validate against.
    #[arg(short = 't', long = "type")]
    type_name: String,
    /// JSON documents (stdin when omitted).
    inputs: Vec<PathBuf>,
    /// Schema file extension used for directories.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("reading stdin")?;
    Ok(text)
}

/// Parse and finalize schemas; `None` when errors were printed.
fn load_schemas(paths: &[PathBuf], extension: &str) -> anyhow::Result<Option<SchemaMarkdownParser>> {
    let mut parser = SchemaMarkdownParser::new();
    if paths.is_empty() {
        parser.parse_str(&read_stdin()?, "");
    }
    for path in paths {
        parser.load_with_extension(path, extension)?;
    }
    if let Err(err) = parser.finalize() {
        eprintln!("{err}");
        return Ok(None);
    }
    Ok(Some(parser))
}

fn compile(args: &CompileArgs) -> anyhow::Result<ExitCode> {
    let Some(parser) = load_schemas(&args.paths, &args.extension)? else {
        return Ok(ExitCode::from(1));
    };
    let model = TypeModel {
        title: args.title.clone(),
        types: parser.into_types(),
    };
    let style = if args.compact {
        DumpStyle::Compact
    } else {
        DumpStyle::Pretty
    };
    let text = dump_type_model(&model, style)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, text + "\n").with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), types = model.types.len(), "wrote type model");
        }
        None => println!("{text}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(args: &ValidateArgs) -> anyhow::Result<ExitCode> {
    let Some(parser) = load_schemas(&args.schemas, &args.extension)? else {
        return Ok(ExitCode::from(1));
    };
    let inputs: Vec<(String, String)> = if args.inputs.is_empty() {
        vec![("<stdin>".to_string(), read_stdin()?)]
    } else {
        args.inputs
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .map(|text| (path.display().to_string(), text))
                    .with_context(|| format!("reading {}", path.display()))
            })
            .collect::<anyhow::Result<_>>()?
    };

    let mut failed = false;
    for (name, text) in inputs {
        let json: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("{name}: invalid JSON"))?;
        match validate_type(&parser.types, &args.type_name, &Value::from(json)) {
            Ok(value) => {
                tracing::debug!(input = %name, "valid");
                println!("{}", dump_value(&value, DumpStyle::Compact)?);
            }
            Err(err) => {
                eprintln!("{name}: error: {err}");
                failed = true;
            }
        }
    }
    Ok(if failed { ExitCode::from(1) } else { ExitCode::SUCCESS })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Compile(args) => compile(args),
        Command::Validate(args) => validate(args),
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
