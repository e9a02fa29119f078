//! Parser/Validator: raw arguments in, [`ValidatedCommand`] or
//! [`ParseError`] out.
//!
//! Tokens are scanned left to right against an [`OptionSchema`]:
//!
//! - `--` ends option processing; every later token is positional.
//! - `--name`, `--name=value`, `-s` and `-s value` select options. A lone `-`
//!   is positional.
//! - A value-taking option consumes the next token verbatim, even when it
//!   starts with `-`.
//! - When the schema declares subcommands, the first positional token picks
//!   one (by name or alias).
//! - Remaining positional tokens bind to the scope's positionals in order.
//!
//! The first scan error stops parsing. Missing required arguments are checked
//! last and reported together.
//!
//! # Example
//!
//! ```
//! use swifty_gr_core::*;
//!
//! let schema = OptionSchema::build(
//!     "greet",
//!     [ArgSpec::single("name", ValueType::String).required()],
//! )
//! .unwrap();
//!
//! let cmd = parse(&schema, ["--name", "ada"]).unwrap();
//! assert_eq!(cmd.string("name"), Some("ada"));
//!
//! let err = parse(&schema, Vec::<String>::new()).unwrap_err();
//! assert_eq!(err, ParseError::MissingRequired(vec!["name".to_string()]));
//! ```

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{ArgKind, ArgSpec, OptionSchema, SubcommandSpec, ValidatedCommand, Value, ValueType};

/// Parse failures and informational requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An option-like token that no visible argument matches.
    #[error("unknown argument '{token}'")]
    UnknownArgument { token: String },
    /// A value that does not convert under the argument's value type.
    #[error("invalid value '{value}' for '{name}': {reason}")]
    TypeConversion {
        name: String,
        value: String,
        reason: String,
    },
    /// Every required argument absent after the scan, in declaration order.
    #[error("missing required argument(s): {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    /// A positional token beyond the declared positionals.
    #[error("unexpected argument '{token}'")]
    UnexpectedArgument { token: String },
    /// A value-taking option was the last token.
    #[error("option '{token}' requires a value")]
    MissingValue { name: String, token: String },
    /// A single-valued option given more than once.
    #[error("argument '{name}' cannot be used multiple times (at '{token}')")]
    DuplicateArgument { name: String, token: String },
    /// `-h` / `--help` was given.
    #[error("help requested")]
    HelpRequested { subcommand: Option<String> },
    /// `-V` / `--version` was given.
    #[error("version requested")]
    VersionRequested,
}

impl ParseError {
    /// The raw token the error is about, when there is one.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnknownArgument { token }
            | Self::UnexpectedArgument { token }
            | Self::MissingValue { token, .. }
            | Self::DuplicateArgument { token, .. } => Some(token),
            Self::TypeConversion { value, .. } => Some(value),
            Self::MissingRequired(_) | Self::HelpRequested { .. } | Self::VersionRequested => None,
        }
    }

    /// Returns `true` for help/version requests, which are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::HelpRequested { .. } | Self::VersionRequested)
    }
}

/// Parses `args` (program name excluded) against `schema`.
///
/// Shorthand for [`Parser::new(schema).parse(args)`](Parser::parse).
pub fn parse<I, S>(schema: &OptionSchema, args: I) -> Result<ValidatedCommand, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new(schema).parse(args)
}

/// Schema-driven argument parser.
///
/// Holds only a shared reference to the schema, so parsing is repeatable and
/// never mutates anything.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'s> {
    schema: &'s OptionSchema,
}

impl<'s> Parser<'s> {
    pub fn new(schema: &'s OptionSchema) -> Self {
        Self { schema }
    }

    /// Parses `args` (program name excluded).
    ///
    /// # Errors
    ///
    /// The first scan error ([`UnknownArgument`](ParseError::UnknownArgument),
    /// [`TypeConversion`](ParseError::TypeConversion),
    /// [`UnexpectedArgument`](ParseError::UnexpectedArgument),
    /// [`MissingValue`](ParseError::MissingValue),
    /// [`DuplicateArgument`](ParseError::DuplicateArgument)), a help/version
    /// request, or else [`MissingRequired`](ParseError::MissingRequired) with
    /// every absent required name.
    pub fn parse<I, S>(&self, args: I) -> Result<ValidatedCommand, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let mut scan = Scan::new(self.schema);
        scan.run(&tokens)?;
        scan.finish()
    }
}

/// Mutable state of one parse.
struct Scan<'s> {
    schema: &'s OptionSchema,
    scope: Option<&'s SubcommandSpec>,
    subcommand: Option<String>,
    unresolved: Vec<String>,
    options_done: bool,
    next_positional: usize,
    collected: BTreeMap<String, Vec<Value>>,
}

impl<'s> Scan<'s> {
    fn new(schema: &'s OptionSchema) -> Self {
        Self {
            schema,
            scope: None,
            subcommand: None,
            unresolved: Vec::new(),
            options_done: false,
            next_positional: 0,
            collected: BTreeMap::new(),
        }
    }

    fn run(&mut self, tokens: &[String]) -> Result<(), ParseError> {
        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];
            index += 1;

            if !self.options_done && token == "--" {
                trace!("end of options");
                self.options_done = true;
                continue;
            }

            if !self.options_done && is_option_like(token) {
                let next = tokens.get(index);
                if self.option(token, next)? {
                    index += 1;
                }
                continue;
            }

            if self.schema.has_subcommands() && self.subcommand.is_none() {
                match self.schema.find_subcommand(token) {
                    Some(sub) => {
                        debug!(subcommand = %sub.name, token = %token, "selected subcommand");
                        self.scope = Some(sub);
                        self.subcommand = Some(sub.name.clone());
                    }
                    None => {
                        debug!(token = %token, "undeclared subcommand, scan stopped");
                        self.subcommand = Some(token.clone());
                        self.unresolved = tokens[index..].to_vec();
                        return Ok(());
                    }
                }
                continue;
            }

            self.positional(token)?;
        }
        Ok(())
    }

    /// Handles an option token. Returns `true` when the following token was
    /// consumed as its value.
    fn option(&mut self, token: &str, next: Option<&String>) -> Result<bool, ParseError> {
        let (flag, inline) = split_inline_value(token);

        match flag {
            "--help" | "-h" => {
                return Err(ParseError::HelpRequested {
                    subcommand: self.scope.map(|s| s.name.clone()),
                });
            }
            "--version" | "-V" if self.schema.version().is_some() => {
                return Err(ParseError::VersionRequested);
            }
            _ => {}
        }

        let spec = self
            .schema
            .find_option(flag, self.scope)
            .ok_or_else(|| ParseError::UnknownArgument {
                token: token.to_string(),
            })?;
        trace!(arg = %spec.name, token = %token, "matched option");

        match spec.kind {
            ArgKind::Flag => {
                let value = match inline {
                    Some(raw) => convert(spec, &ValueType::Bool, raw)?,
                    None => Value::Bool(true),
                };
                self.record(spec, value, token)?;
                Ok(false)
            }
            ArgKind::Count => {
                if let Some(raw) = inline {
                    return Err(ParseError::TypeConversion {
                        name: spec.name.clone(),
                        value: raw.to_string(),
                        reason: "flag does not take a value".to_string(),
                    });
                }
                self.record(spec, Value::Bool(true), token)?;
                Ok(false)
            }
            ArgKind::Single | ArgKind::Repeated => {
                let (raw, consumed) = match (inline, next) {
                    (Some(raw), _) => (raw, false),
                    (None, Some(next)) => (next.as_str(), true),
                    (None, None) => {
                        return Err(ParseError::MissingValue {
                            name: spec.name.clone(),
                            token: token.to_string(),
                        });
                    }
                };
                let value = convert(spec, &spec.value_type, raw)?;
                self.record(spec, value, token)?;
                Ok(consumed)
            }
            // `find_option` never matches positionals.
            ArgKind::Positional => Err(ParseError::UnknownArgument {
                token: token.to_string(),
            }),
        }
    }

    fn positional(&mut self, token: &str) -> Result<(), ParseError> {
        let positionals = self.schema.positionals(self.scope);
        let Some(spec) = positionals.get(self.next_positional).copied() else {
            return Err(ParseError::UnexpectedArgument {
                token: token.to_string(),
            });
        };

        let value = convert(spec, &spec.value_type, token)?;
        trace!(arg = %spec.name, token = %token, "bound positional");
        self.collected
            .entry(spec.name.clone())
            .or_default()
            .push(value);

        if !spec.collect_remaining {
            self.next_positional += 1;
        }
        Ok(())
    }

    fn record(&mut self, spec: &ArgSpec, value: Value, token: &str) -> Result<(), ParseError> {
        let values = self.collected.entry(spec.name.clone()).or_default();
        if !values.is_empty() && matches!(spec.kind, ArgKind::Flag | ArgKind::Single) {
            return Err(ParseError::DuplicateArgument {
                name: spec.name.clone(),
                token: token.to_string(),
            });
        }
        values.push(value);
        Ok(())
    }

    /// Applies defaults and checks required arguments.
    fn finish(mut self) -> Result<ValidatedCommand, ParseError> {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();

        for spec in self.schema.visible_args(self.scope) {
            let given = self.collected.remove(&spec.name).unwrap_or_default();
            if given.is_empty() && spec.required {
                missing.push(spec.name.clone());
                continue;
            }
            if let Some(value) = settle(spec, given)? {
                values.insert(spec.name.clone(), value);
            }
        }

        if !missing.is_empty() {
            debug!(missing = ?missing, "required arguments absent");
            return Err(ParseError::MissingRequired(missing));
        }

        Ok(ValidatedCommand::new(
            self.schema.command().to_string(),
            self.subcommand,
            values,
            self.unresolved,
        ))
    }
}

/// Folds the collected occurrences of one argument into its final value,
/// falling back to the default.
fn settle(spec: &ArgSpec, given: Vec<Value>) -> Result<Option<Value>, ParseError> {
    match spec.kind {
        ArgKind::Flag => match given.into_iter().next() {
            Some(value) => Ok(Some(value)),
            None => default_or(spec, &ValueType::Bool, Value::Bool(false)).map(Some),
        },
        ArgKind::Count => {
            if given.is_empty() {
                default_or(spec, &ValueType::Integer, Value::Integer(0)).map(Some)
            } else {
                Ok(Some(Value::Integer(i64::try_from(given.len()).unwrap_or(i64::MAX))))
            }
        }
        _ if spec.is_list() => {
            if given.is_empty() {
                let defaults = match &spec.default {
                    Some(raw) => vec![convert(spec, &spec.value_type, raw)?],
                    None => Vec::new(),
                };
                Ok(Some(Value::List(defaults)))
            } else {
                Ok(Some(Value::List(given)))
            }
        }
        _ => match given.into_iter().next() {
            Some(value) => Ok(Some(value)),
            None => spec
                .default
                .as_deref()
                .map(|raw| convert(spec, &spec.value_type, raw))
                .transpose(),
        },
    }
}

fn default_or(spec: &ArgSpec, value_type: &ValueType, fallback: Value) -> Result<Value, ParseError> {
    match &spec.default {
        Some(raw) => convert(spec, value_type, raw),
        None => Ok(fallback),
    }
}

fn convert(spec: &ArgSpec, value_type: &ValueType, raw: &str) -> Result<Value, ParseError> {
    value_type
        .convert(raw)
        .map_err(|reason| ParseError::TypeConversion {
            name: spec.name.clone(),
            value: raw.to_string(),
            reason,
        })
}

fn is_option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Splits `--name=value` into (`--name`, `Some("value")`). Short options
/// never carry an inline value.
fn split_inline_value(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        if let Some((flag, value)) = token.split_once('=') {
            return (flag, Some(value));
        }
    }
    (token, None)
}
