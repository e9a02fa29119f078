//! Tool configuration: the optional YAML config file and the settings
//! resolved from it together with the global command-line options.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swifty_gr_core::ValidatedCommand;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "SWIFTY_GR_CONFIG";

/// Process environment the entry point needs, captured once by `main`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Value of [`CONFIG_ENV`].
    pub config_path: Option<PathBuf>,
    /// Value of `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            config_path: std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            log_filter: std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Contents of the config file.
///
/// ```yaml
/// log_level: debug
/// format: json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Log filter used when neither `RUST_LOG` nor `-v` is given.
    pub log_level: Option<String>,
    /// Output format used when `--format` is not given.
    pub format: OutputFormat,
}

impl ToolConfig {
    /// Loads the configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`CliError::ConfigNotFound`] if the file does not exist,
    /// [`CliError::ConfigIo`] for other read failures and
    /// [`CliError::Config`] if the YAML does not describe a config.
    pub fn load(path: &Path) -> CliResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CliError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CliError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Effective settings for one invocation. Command-line options win over the
/// config file, which wins over built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub verbosity: u64,
    pub log_level: Option<String>,
}

impl Settings {
    pub fn resolve(command: &ValidatedCommand, env: &Environment) -> CliResult<Self> {
        let config_path = command
            .path("config")
            .map(Path::to_path_buf)
            .or_else(|| env.config_path.clone());

        let config = match config_path {
            Some(path) => ToolConfig::load(&path)?,
            None => ToolConfig::default(),
        };

        Ok(Self {
            format: command
                .string("format")
                .and_then(OutputFormat::from_name)
                .unwrap_or(config.format),
            verbosity: command.count("verbose"),
            log_level: config.log_level,
        })
    }
}
