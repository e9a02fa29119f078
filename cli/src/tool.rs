//! The `swifty-gr` command set: its option schema and one action per
//! subcommand.

use std::io::Write;
use std::path::{Path, PathBuf};

use swifty_gr_core::{
    Action, ArgSpec, Dispatcher, OptionSchema, ParseError, SchemaError, SubcommandSpec,
    ValidatedCommand, ValueType, check_definition, load_schema, parse, render_usage,
};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::output::{CheckReport, OutputFormat, format_check, format_command, format_schema};

pub const NAME: &str = "swifty-gr";

/// Builds the tool's own option schema.
pub fn schema() -> Result<OptionSchema, SchemaError> {
    let formats = OutputFormat::NAMES.iter().map(|n| n.to_string()).collect();

    OptionSchema::builder(NAME)
        .description("Schema-driven command-line front end")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            ArgSpec::count("verbose")
                .with_short('v')
                .with_description("Increase log verbosity (repeatable)"),
        )
        .arg(
            ArgSpec::single("config", ValueType::Path)
                .with_short('c')
                .with_description("Configuration file"),
        )
        .arg(
            ArgSpec::single("format", ValueType::Choice(formats))
                .with_short('f')
                .with_description("Output format"),
        )
        .subcommand(
            SubcommandSpec::new("schema").with_description("Print this tool's own option schema"),
        )
        .subcommand(
            SubcommandSpec::new("check")
                .with_description("Validate a schema definition file")
                .with_arg(schema_file_arg()),
        )
        .subcommand(
            SubcommandSpec::new("parse")
                .with_description("Parse arguments against a schema definition file")
                .with_arg(schema_file_arg())
                .with_arg(
                    ArgSpec::positional("args", ValueType::String)
                        .collect_remaining()
                        .with_description("Arguments to parse, after `--`"),
                ),
        )
        .subcommand(
            SubcommandSpec::new("usage")
                .with_description("Print help text generated from a schema definition file")
                .with_alias("help-for")
                .with_arg(schema_file_arg())
                .with_arg(
                    ArgSpec::single("subcommand", ValueType::String)
                        .with_short('s')
                        .with_description("Show help for this subcommand"),
                ),
        )
        .build()
}

fn schema_file_arg() -> ArgSpec {
    ArgSpec::positional("schema", ValueType::Path)
        .required()
        .with_description("Schema definition (.json, .yaml or .yml)")
}

/// Wires every subcommand to its action.
pub fn dispatcher<'a>(schema: &'a OptionSchema, settings: &Settings) -> Dispatcher<'a, CliError> {
    let format = settings.format;
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register("schema", PrintSchema { schema, format })
        .register("check", Check { format })
        .register("parse", ParseArgs { format })
        .register("usage", Usage);
    dispatcher
}

struct PrintSchema<'a> {
    schema: &'a OptionSchema,
    format: OutputFormat,
}

impl Action<CliError> for PrintSchema<'_> {
    fn run(&self, _command: &ValidatedCommand, out: &mut dyn Write) -> CliResult<()> {
        out.write_all(format_schema(self.schema, self.format)?.as_bytes())?;
        Ok(())
    }
}

struct Check {
    format: OutputFormat,
}

impl Action<CliError> for Check {
    fn run(&self, command: &ValidatedCommand, out: &mut dyn Write) -> CliResult<()> {
        let path = schema_path(command)?;
        let (def, errors) = check_definition(path).map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        if !errors.is_empty() {
            return Err(CliError::InvalidSchema {
                path: path.to_path_buf(),
                errors,
            });
        }

        let schema = OptionSchema::try_from(def).map_err(|e| CliError::InvalidSchema {
            path: path.to_path_buf(),
            errors: vec![e],
        })?;
        info!(command = schema.command(), "schema is valid");
        out.write_all(format_check(&CheckReport::new(&schema), self.format)?.as_bytes())?;
        Ok(())
    }
}

struct ParseArgs {
    format: OutputFormat,
}

impl Action<CliError> for ParseArgs {
    fn run(&self, command: &ValidatedCommand, out: &mut dyn Write) -> CliResult<()> {
        let schema = load(schema_path(command)?)?;
        let args = command.strings("args");
        debug!(command = schema.command(), ?args, "parsing against user schema");

        match parse(&schema, &args) {
            Ok(parsed) => {
                if let Some(name) = parsed.subcommand() {
                    if schema.find_subcommand(name).is_none() {
                        return Err(CliError::UnknownSubcommand {
                            command: schema.command().to_string(),
                            name: name.to_string(),
                        });
                    }
                }
                out.write_all(format_command(&parsed, self.format)?.as_bytes())?;
            }
            Err(ParseError::HelpRequested { subcommand }) => {
                out.write_all(render_usage(&schema, subcommand.as_deref()).as_bytes())?;
            }
            Err(ParseError::VersionRequested) => {
                writeln!(
                    out,
                    "{} {}",
                    schema.command(),
                    schema.version().unwrap_or_default()
                )?;
            }
            Err(source) => {
                return Err(CliError::Arguments {
                    command: schema.command().to_string(),
                    source,
                });
            }
        }
        Ok(())
    }
}

struct Usage;

impl Action<CliError> for Usage {
    fn run(&self, command: &ValidatedCommand, out: &mut dyn Write) -> CliResult<()> {
        let schema = load(schema_path(command)?)?;
        let subcommand = command.string("subcommand");
        if let Some(name) = subcommand {
            if schema.find_subcommand(name).is_none() {
                return Err(CliError::UnknownSubcommand {
                    command: schema.command().to_string(),
                    name: name.to_string(),
                });
            }
        }
        out.write_all(render_usage(&schema, subcommand).as_bytes())?;
        Ok(())
    }
}

fn schema_path(command: &ValidatedCommand) -> CliResult<&Path> {
    command
        .path("schema")
        .ok_or_else(|| CliError::Internal("schema path missing after parse".to_string()))
}

fn load(path: &Path) -> CliResult<OptionSchema> {
    load_schema(path).map_err(|source| CliError::Load {
        path: PathBuf::from(path),
        source,
    })
}
