//! Schema validation.
//!
//! Checks the structural invariants of a [`SchemaDefinition`] before it is
//! turned into an immutable [`OptionSchema`](crate::OptionSchema): unique
//! names per scope, at most one trailing "collect remaining" positional,
//! well-formed names and short forms, and defaults that convert under their
//! value type.
//!
//! # Examples
//!
//! ```
//! use swifty_gr_core::*;
//!
//! let mut def = SchemaDefinition::new("greet");
//! def.args.push(ArgSpec::single("name", ValueType::String).required());
//! assert!(validate_definition(&def).is_empty());
//!
//! // Invalid: the same name twice in one scope
//! def.args.push(ArgSpec::flag("name"));
//! assert_eq!(
//!     validate_definition(&def),
//!     vec![SchemaError::DuplicateArgument("name".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgKind, ArgSpec, SchemaDefinition, SubcommandSpec, ValueType};

/// Names reserved for the built-in help and version switches.
pub const RESERVED_NAMES: &[&str] = &["help", "version"];

/// Short forms reserved for the built-in help and version switches.
pub const RESERVED_SHORTS: &[char] = &['h', 'V'];

/// Schema build and lookup errors.
///
/// Every variant except [`NotFound`](SchemaError::NotFound) describes a
/// malformed schema. These are programmer errors: a correctly configured
/// tool never produces them at run time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Command name is empty or whitespace-only.
    #[error("schema command cannot be empty")]
    EmptyCommandName,
    /// Argument name is empty, starts with `-`, or contains whitespace or `=`.
    #[error("invalid argument name: '{0}'")]
    InvalidArgName(String),
    /// Two arguments visible in the same scope share a name.
    #[error("duplicate argument in scope: {0}")]
    DuplicateArgument(String),
    /// Two arguments visible in the same scope share a short form.
    #[error("duplicate short flag in scope: -{0}")]
    DuplicateShort(char),
    /// Short form is not an ASCII letter or digit.
    #[error("invalid short flag: '{0}'")]
    InvalidShort(char),
    /// Name or short form collides with `help`/`version`.
    #[error("reserved argument name: {0}")]
    ReservedName(String),
    /// A second positional in one scope is marked "collect remaining".
    #[error("more than one collect-remaining positional: {0}")]
    MultipleCollectRemaining(String),
    /// A collecting positional is followed by another positional.
    #[error("collect-remaining positional must be last: {0}")]
    CollectRemainingNotLast(String),
    /// `collect_remaining` set on a non-positional argument.
    #[error("only positionals can collect remaining arguments: {0}")]
    CollectRemainingOnOption(String),
    /// Short form set on a positional.
    #[error("positional cannot have a short flag: {0}")]
    ShortOnPositional(String),
    /// A flag or counted flag marked required.
    #[error("flag cannot be required: {0}")]
    RequiredFlag(String),
    /// A required argument that also carries a default.
    #[error("required argument cannot have a default: {0}")]
    RequiredWithDefault(String),
    /// Default does not convert under the argument's value type.
    #[error("invalid default '{value}' for '{name}': {reason}")]
    InvalidDefault {
        name: String,
        value: String,
        reason: String,
    },
    /// Subcommand name or alias is empty.
    #[error("subcommand name cannot be empty")]
    EmptySubcommandName,
    /// Subcommand name or alias starts with `-`, or contains whitespace or `=`.
    #[error("invalid subcommand name: '{0}'")]
    InvalidSubcommandName(String),
    /// Two subcommands share a name or alias.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// Global positional declared alongside subcommands.
    #[error("global positional not allowed when subcommands are declared: {0}")]
    PositionalWithSubcommands(String),
    /// Lookup of an undeclared argument or subcommand.
    #[error("not found in schema: {0}")]
    NotFound(String),
}

/// Validates a schema definition.
///
/// Returns every problem found, in declaration order. An empty vector means
/// the definition can be built.
pub fn validate_definition(def: &SchemaDefinition) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if def.command.trim().is_empty() {
        errors.push(SchemaError::EmptyCommandName);
    }

    let mut global_names = HashSet::new();
    let mut global_shorts = HashSet::new();
    validate_scope(&def.args, &mut global_names, &mut global_shorts, &mut errors);

    if !def.subcommands.is_empty() {
        for arg in def.args.iter().filter(|a| a.kind == ArgKind::Positional) {
            errors.push(SchemaError::PositionalWithSubcommands(arg.name.clone()));
        }
    }

    validate_subcommands(&def.subcommands, &global_names, &global_shorts, &mut errors);

    errors
}

fn validate_subcommands(
    subcommands: &[SubcommandSpec],
    global_names: &HashSet<String>,
    global_shorts: &HashSet<char>,
    errors: &mut Vec<SchemaError>,
) {
    let mut seen: HashSet<&str> = HashSet::new();

    for sub in subcommands {
        for name in std::iter::once(&sub.name).chain(sub.aliases.iter()) {
            let name = name.trim();
            if name.is_empty() {
                errors.push(SchemaError::EmptySubcommandName);
                continue;
            }
            if !is_valid_name(name) {
                errors.push(SchemaError::InvalidSubcommandName(name.to_string()));
            }
            if !seen.insert(name) {
                errors.push(SchemaError::DuplicateSubcommand(name.to_string()));
            }
        }

        let mut names = global_names.clone();
        let mut shorts = global_shorts.clone();
        validate_scope(&sub.args, &mut names, &mut shorts, errors);
    }
}

fn validate_scope(
    args: &[ArgSpec],
    names: &mut HashSet<String>,
    shorts: &mut HashSet<char>,
    errors: &mut Vec<SchemaError>,
) {
    let mut collector: Option<&str> = None;

    for arg in args {
        validate_name(arg, errors);

        if !names.insert(arg.name.clone()) {
            errors.push(SchemaError::DuplicateArgument(arg.name.clone()));
        }

        if let Some(short) = arg.short {
            if arg.kind == ArgKind::Positional {
                errors.push(SchemaError::ShortOnPositional(arg.name.clone()));
            } else if !short.is_ascii_alphanumeric() {
                errors.push(SchemaError::InvalidShort(short));
            } else if RESERVED_SHORTS.contains(&short) {
                errors.push(SchemaError::ReservedName(format!("-{short}")));
            } else if !shorts.insert(short) {
                errors.push(SchemaError::DuplicateShort(short));
            }
        }

        if arg.kind == ArgKind::Positional {
            if let Some(first) = collector {
                if arg.collect_remaining {
                    errors.push(SchemaError::MultipleCollectRemaining(arg.name.clone()));
                } else {
                    errors.push(SchemaError::CollectRemainingNotLast(first.to_string()));
                }
            }
            if arg.collect_remaining && collector.is_none() {
                collector = Some(&arg.name);
            }
        } else if arg.collect_remaining {
            errors.push(SchemaError::CollectRemainingOnOption(arg.name.clone()));
        }

        if arg.required && matches!(arg.kind, ArgKind::Flag | ArgKind::Count) {
            errors.push(SchemaError::RequiredFlag(arg.name.clone()));
        }

        if let Some(default) = &arg.default {
            if arg.required {
                errors.push(SchemaError::RequiredWithDefault(arg.name.clone()));
            }
            let converted = match arg.kind {
                ArgKind::Flag => ValueType::Bool.convert(default),
                ArgKind::Count => ValueType::Integer.convert(default),
                _ => arg.value_type.convert(default),
            };
            if let Err(reason) = converted {
                errors.push(SchemaError::InvalidDefault {
                    name: arg.name.clone(),
                    value: default.clone(),
                    reason,
                });
            }
        }
    }
}

/// Names must be non-empty and must not look like an option or carry an
/// inline value.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.contains('=')
        && !name.chars().any(char::is_whitespace)
}

fn validate_name(arg: &ArgSpec, errors: &mut Vec<SchemaError>) {
    let name = arg.name.as_str();
    if !is_valid_name(name) {
        errors.push(SchemaError::InvalidArgName(name.to_string()));
    } else if RESERVED_NAMES.contains(&name) {
        errors.push(SchemaError::ReservedName(name.to_string()));
    }
}
