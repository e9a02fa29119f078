//! Typed argument values and raw-text conversion.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ValueType;

/// A converted argument value.
///
/// Serializes untagged, so a parsed command renders as plain JSON/YAML
/// (`{"name": "ada", "jobs": 4}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Path(PathBuf),
    /// Values of a repeated option or collecting positional, in order.
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the text of `String` values (choices included).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl ValueType {
    /// Converts raw command-line text into a [`Value`].
    ///
    /// On failure returns a short human-readable reason; the parser wraps it
    /// together with the argument name and the offending text.
    ///
    /// # Examples
    ///
    /// ```
    /// use swifty_gr_core::{Value, ValueType};
    ///
    /// assert_eq!(ValueType::Bool.convert("yes"), Ok(Value::Bool(true)));
    /// assert!(ValueType::Integer.convert("4x").is_err());
    /// ```
    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Bool => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| "expected true or false".to_string()),
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string()),
            Self::Float => {
                let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
                if value.is_finite() {
                    Ok(Value::Float(value))
                } else {
                    Err("expected a finite number".to_string())
                }
            }
            Self::Path => {
                if raw.is_empty() {
                    Err("path cannot be empty".to_string())
                } else {
                    Ok(Value::Path(PathBuf::from(raw)))
                }
            }
            Self::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(format!("expected one of: {}", choices.join(", ")))
                }
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
