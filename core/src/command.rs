//! The Validated Command produced by a successful parse.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::Value;

/// Typed, fully populated result of parsing an argument list.
///
/// Defaults are already applied: absent flags read as `false`, absent counted
/// flags as `0`, absent repeated options and collecting positionals as empty
/// lists. Optional arguments without a default are simply absent.
///
/// The value is immutable; only the parser constructs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedCommand {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcommand: Option<String>,
    values: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<String>,
}

impl ValidatedCommand {
    pub(crate) fn new(
        command: String,
        subcommand: Option<String>,
        values: BTreeMap<String, Value>,
        unresolved: Vec<String>,
    ) -> Self {
        Self {
            command,
            subcommand,
            values,
            unresolved,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Canonical name of the selected subcommand (aliases are resolved).
    ///
    /// When the name was not declared in the schema this is the raw token,
    /// left for the dispatcher to reject.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Raw tokens that followed an undeclared subcommand name, unscanned.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All values keyed by argument name.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Boolean flag value; `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Counted flag value; `0` when absent.
    pub fn count(&self, name: &str) -> u64 {
        self.get(name)
            .and_then(Value::as_i64)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.get(name).and_then(Value::as_path)
    }

    /// List value of a repeated option or collecting positional; empty when
    /// absent.
    pub fn list(&self, name: &str) -> &[Value] {
        self.get(name).and_then(Value::as_list).unwrap_or(&[])
    }

    /// Text items of a list value, skipping non-string items.
    pub fn strings(&self, name: &str) -> Vec<&str> {
        self.list(name).iter().filter_map(Value::as_str).collect()
    }
}
