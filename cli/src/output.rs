//! Output formatting for schemas, parsed commands and check reports.

use serde::{Deserialize, Serialize};
use swifty_gr_core::{OptionSchema, ValidatedCommand, render_usage};

use crate::error::{CliError, CliResult};

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Text,
}

impl OutputFormat {
    /// Names accepted by `--format` and the config file.
    pub const NAMES: [&'static str; 3] = ["json", "yaml", "text"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Summary produced by `check` for a definition that passed validation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub command: String,
    pub valid: bool,
    pub arguments: usize,
    pub subcommands: usize,
}

impl CheckReport {
    pub fn new(schema: &OptionSchema) -> Self {
        Self {
            command: schema.command().to_string(),
            valid: true,
            arguments: schema.args().len()
                + schema
                    .subcommands()
                    .iter()
                    .map(|sub| sub.args.len())
                    .sum::<usize>(),
            subcommands: schema.subcommands().len(),
        }
    }
}

/// Formats a schema. The text form is its help output.
pub fn format_schema(schema: &OptionSchema, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(schema),
        OutputFormat::Yaml => to_yaml(schema),
        OutputFormat::Text => Ok(render_usage(schema, None)),
    }
}

/// Formats the result of a successful parse.
pub fn format_command(command: &ValidatedCommand, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(command),
        OutputFormat::Yaml => to_yaml(command),
        OutputFormat::Text => Ok(command_to_text(command)),
    }
}

pub fn format_check(report: &CheckReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
        OutputFormat::Text => Ok(format!(
            "ok: schema '{}' ({} argument(s), {} subcommand(s))\n",
            report.command, report.arguments, report.subcommands
        )),
    }
}

fn command_to_text(command: &ValidatedCommand) -> String {
    let mut out = String::from(command.command());
    if let Some(sub) = command.subcommand() {
        out.push(' ');
        out.push_str(sub);
    }
    out.push('\n');

    for (name, value) in command.values() {
        out.push_str(&format!("  {name}: {value}\n"));
    }
    if !command.unresolved().is_empty() {
        out.push_str(&format!("  (unresolved: {})\n", command.unresolved().join(" ")));
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Serialize(format!("JSON serialization failed: {e}")))?;
    text.push('\n');
    Ok(text)
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_yaml::to_string(value)
        .map_err(|e| CliError::Serialize(format!("YAML serialization failed: {e}")))
}
