//! Errors raised by the built-in actions and configuration loading.

use std::path::PathBuf;

use swifty_gr_core::{LoadError, ParseError, SchemaError};
use thiserror::Error;

use crate::exitcode;

/// Top-level error type of the binary. These are what get shown to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// The tool's own schema failed to build.
    #[error("built-in schema is invalid: {0}")]
    BuiltinSchema(#[from] SchemaError),

    #[error("failed to load schema '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("invalid schema '{}' ({} problem(s))", .path.display(), .errors.len())]
    InvalidSchema {
        path: PathBuf,
        errors: Vec<SchemaError>,
    },

    /// Arguments given to `parse` do not match the user's schema.
    #[error("arguments do not match schema '{command}': {source}")]
    Arguments {
        command: String,
        #[source]
        source: ParseError,
    },

    #[error("unknown command '{name}' for schema '{command}'")]
    UnknownSubcommand { command: String, name: String },

    #[error("config file '{}' not found", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read config file '{}': {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Serialize(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::BuiltinSchema(_) | CliError::Serialize(_) | CliError::Internal(_) => {
                exitcode::SOFTWARE
            }
            CliError::Load { source, .. } => match source {
                LoadError::Io(_) => exitcode::NOINPUT,
                LoadError::Json(_) | LoadError::Yaml(_) | LoadError::Invalid(_) => {
                    exitcode::DATAERR
                }
            },
            CliError::InvalidSchema { .. }
            | CliError::Arguments { .. }
            | CliError::UnknownSubcommand { .. } => exitcode::DATAERR,
            CliError::ConfigNotFound { .. } | CliError::ConfigIo { .. } => exitcode::NOINPUT,
            CliError::Config { .. } => exitcode::CONFIG,
            CliError::Output(_) => exitcode::IOERR,
        }
    }

    /// Extra lines shown under the main message.
    pub fn details(&self) -> Vec<String> {
        match self {
            CliError::InvalidSchema { errors, .. } => {
                errors.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}
