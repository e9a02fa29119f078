//! Tracing subscriber setup. Logs go to stderr so stdout stays clean for
//! command output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{Environment, Settings};

/// Picks the filter directive: `RUST_LOG` first, then the `-v` count, then
/// the config file's `log_level`, then `warn`.
pub fn filter_directive(settings: &Settings, env: &Environment) -> String {
    if let Some(filter) = &env.log_filter {
        return filter.clone();
    }
    match settings.verbosity {
        0 => settings
            .log_level
            .clone()
            .unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber. Later calls keep the first subscriber.
pub fn init(settings: &Settings, env: &Environment) {
    let directive = filter_directive(settings, env);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
