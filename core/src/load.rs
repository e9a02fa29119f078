//! Loading schema definition files.
//!
//! Definitions are JSON (`.json`) or YAML (anything else, typically `.yaml`
//! or `.yml`):
//!
//! ```yaml
//! command: greet
//! description: Say hello
//! args:
//!   - name: name
//!     short: n
//!     required: true
//!   - name: loud
//!     kind: flag
//! ```

use std::io::BufReader;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::{OptionSchema, SchemaDefinition, SchemaError, validate_definition};

/// Errors raised while loading a schema definition.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition parsed but violates a schema invariant.
    #[error("invalid schema: {0}")]
    Invalid(#[from] SchemaError),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;

/// Reads a definition file without validating it.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, [`LoadError::Json`] or
/// [`LoadError::Yaml`] if it does not parse.
pub fn load_definition(path: impl AsRef<Path>) -> Result<SchemaDefinition> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);

    let def = if is_json(path) {
        serde_json::from_reader(reader)?
    } else {
        serde_yaml::from_reader(reader)?
    };
    debug!(path = %path.display(), "loaded schema definition");
    Ok(def)
}

/// Reads and validates a definition file.
///
/// # Errors
///
/// Everything [`load_definition`] returns, plus [`LoadError::Invalid`] with
/// the first invariant violation.
///
/// # Examples
///
/// ```no_run
/// use swifty_gr_core::load_schema;
///
/// let schema = load_schema("greet.yaml").unwrap();
/// println!("{} takes {} argument(s)", schema.command(), schema.args().len());
/// ```
pub fn load_schema(path: impl AsRef<Path>) -> Result<OptionSchema> {
    Ok(OptionSchema::try_from(load_definition(path)?)?)
}

/// Parses and validates a YAML definition.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::schema_from_yaml_str;
///
/// let schema = schema_from_yaml_str("command: greet\nargs:\n  - name: name\n").unwrap();
/// assert!(schema.lookup("name").is_ok());
/// ```
pub fn schema_from_yaml_str(raw: &str) -> Result<OptionSchema> {
    let def: SchemaDefinition = serde_yaml::from_str(raw)?;
    Ok(OptionSchema::try_from(def)?)
}

/// Parses and validates a JSON definition.
pub fn schema_from_json_str(raw: &str) -> Result<OptionSchema> {
    let def: SchemaDefinition = serde_json::from_str(raw)?;
    Ok(OptionSchema::try_from(def)?)
}

/// Reads a definition and reports every invariant violation instead of the
/// first one.
///
/// # Errors
///
/// Only I/O and parse failures; invariant violations are the `Ok` payload.
pub fn check_definition(path: impl AsRef<Path>) -> Result<(SchemaDefinition, Vec<SchemaError>)> {
    let def = load_definition(path)?;
    let errors = validate_definition(&def);
    Ok((def, errors))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
