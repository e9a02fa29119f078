//! Argument specification types.
//!
//! These are the building blocks of an [`OptionSchema`](crate::OptionSchema):
//! an [`ArgSpec`] describes one flag, option or positional argument, and a
//! [`SubcommandSpec`] groups the arguments that only apply after a
//! subcommand name. All types serialize with [`serde`] so schemas can be
//! written as JSON or YAML definition files.

use serde::{Deserialize, Serialize};

/// How an argument is bound from the command line.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::ArgKind;
///
/// assert!(ArgKind::Single.takes_value());
/// assert!(!ArgKind::Flag.takes_value());
/// assert!(!ArgKind::Positional.is_option());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// Boolean switch (`--verbose`), no value.
    Flag,
    /// Switch that may be repeated; its value is the occurrence count (`-vvv`
    /// style, written as `-v -v -v`).
    Count,
    /// Option taking exactly one value (`--name ada`), the default kind.
    #[default]
    Single,
    /// Option that may be given many times; values are collected in order.
    Repeated,
    /// Bound by position rather than by name.
    Positional,
}

impl ArgKind {
    /// Returns `true` if the argument consumes a value token.
    pub fn takes_value(self) -> bool {
        matches!(self, Self::Single | Self::Repeated | Self::Positional)
    }

    /// Returns `true` for kinds matched by `--name` / `-s` tokens.
    pub fn is_option(self) -> bool {
        !matches!(self, Self::Positional)
    }
}

/// Value type an argument converts its raw text into.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::{Value, ValueType};
///
/// assert_eq!(ValueType::Integer.convert("42"), Ok(Value::Integer(42)));
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert!(format.convert("toml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// `true` / `false` (also `yes`/`no`, `on`/`off`, `1`/`0`).
    Bool,
    /// Any text (the default).
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Filesystem path (non-empty).
    Path,
    /// One of a fixed set of values (e.g. `--format json|yaml`).
    Choice(Vec<String>),
}

/// Specification of a single argument.
///
/// Built with the kind constructors ([`flag`](ArgSpec::flag),
/// [`count`](ArgSpec::count), [`single`](ArgSpec::single),
/// [`repeated`](ArgSpec::repeated), [`positional`](ArgSpec::positional))
/// and refined with the chained `with_*` methods.
///
/// For option kinds the name doubles as the long form: an argument named
/// `name` is matched by `--name`.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::{ArgKind, ArgSpec, ValueType};
///
/// let name = ArgSpec::single("name", ValueType::String)
///     .with_short('n')
///     .required()
///     .with_description("Who to address");
/// assert_eq!(name.kind, ArgKind::Single);
/// assert_eq!(name.long_form(), Some("--name".to_string()));
///
/// let rest = ArgSpec::positional("files", ValueType::Path).collect_remaining();
/// assert!(rest.collect_remaining);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgSpec {
    /// Unique identifier, also the long flag for option kinds.
    pub name: String,
    /// Binding kind.
    #[serde(default)]
    pub kind: ArgKind,
    /// Conversion target. Ignored for `Flag` (always boolean) and `Count`
    /// (always integer).
    #[serde(default)]
    pub value_type: ValueType,
    /// Optional single-character short form (`-n`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Default raw value applied when the argument is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Must the argument be present?
    #[serde(default)]
    pub required: bool,
    /// Positional that takes every remaining positional token.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collect_remaining: bool,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgSpec {
    fn new(name: &str, kind: ArgKind, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value_type,
            short: None,
            default: None,
            required: false,
            collect_remaining: false,
            description: None,
        }
    }

    /// Creates a boolean flag.
    pub fn flag(name: &str) -> Self {
        Self::new(name, ArgKind::Flag, ValueType::Bool)
    }

    /// Creates a counted flag.
    pub fn count(name: &str) -> Self {
        Self::new(name, ArgKind::Count, ValueType::Integer)
    }

    /// Creates an option that takes one value.
    pub fn single(name: &str, value_type: ValueType) -> Self {
        Self::new(name, ArgKind::Single, value_type)
    }

    /// Creates an option that may be repeated.
    pub fn repeated(name: &str, value_type: ValueType) -> Self {
        Self::new(name, ArgKind::Repeated, value_type)
    }

    /// Creates a positional argument.
    pub fn positional(name: &str, value_type: ValueType) -> Self {
        Self::new(name, ArgKind::Positional, value_type)
    }

    /// Adds a short form.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Adds a default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks a positional as collecting all remaining positional tokens.
    pub fn collect_remaining(mut self) -> Self {
        self.collect_remaining = true;
        self
    }

    /// Returns the `--name` form for option kinds, `None` for positionals.
    pub fn long_form(&self) -> Option<String> {
        self.kind.is_option().then(|| format!("--{}", self.name))
    }

    /// Returns the `-s` form if a short form is declared.
    pub fn short_form(&self) -> Option<String> {
        self.short.map(|c| format!("-{c}"))
    }

    /// Returns `true` if this is an option matched by the given token
    /// (`--name` or `-s`).
    ///
    /// # Examples
    ///
    /// ```
    /// use swifty_gr_core::ArgSpec;
    ///
    /// let verbose = ArgSpec::flag("verbose").with_short('v');
    /// assert!(verbose.matches("--verbose"));
    /// assert!(verbose.matches("-v"));
    /// assert!(!verbose.matches("verbose"));
    /// ```
    pub fn matches(&self, token: &str) -> bool {
        if !self.kind.is_option() {
            return false;
        }
        if let Some(long) = token.strip_prefix("--") {
            return long == self.name;
        }
        match (token.strip_prefix('-'), self.short) {
            (Some(rest), Some(short)) => {
                let mut chars = rest.chars();
                chars.next() == Some(short) && chars.next().is_none()
            }
            _ => false,
        }
    }

    /// Returns `true` if the parsed value is a list (repeated options and
    /// collecting positionals).
    pub fn is_list(&self) -> bool {
        self.kind == ArgKind::Repeated
            || (self.kind == ArgKind::Positional && self.collect_remaining)
    }

    /// Placeholder used in usage text, e.g. `NAME` for `name`.
    pub fn value_name(&self) -> String {
        self.name.to_uppercase().replace('-', "_")
    }
}

/// Specification of a subcommand and the arguments scoped to it.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::{ArgSpec, SubcommandSpec, ValueType};
///
/// let build = SubcommandSpec::new("build")
///     .with_alias("b")
///     .with_arg(ArgSpec::flag("release"))
///     .with_arg(ArgSpec::positional("paths", ValueType::Path).collect_remaining());
///
/// assert!(build.answers_to("b"));
/// assert_eq!(build.args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubcommandSpec {
    /// Canonical name.
    pub name: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate names resolving to this subcommand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Arguments only visible after the subcommand name.
    #[serde(default)]
    pub args: Vec<ArgSpec>,
}

impl SubcommandSpec {
    /// Creates a subcommand with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds an argument.
    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Checks the name and aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Iterates over the positional arguments in declaration order.
    pub fn positionals(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(|a| a.kind == ArgKind::Positional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_spec_creation() {
        let flag = ArgSpec::flag("verbose")
            .with_short('v')
            .with_description("Enable verbose output");

        assert_eq!(flag.kind, ArgKind::Flag);
        assert_eq!(flag.value_type, ValueType::Bool);
        assert_eq!(flag.long_form(), Some("--verbose".to_string()));
        assert_eq!(flag.short_form(), Some("-v".to_string()));
        assert!(!flag.required);
    }

    #[test]
    fn test_matches_rejects_clusters_and_positionals() {
        let flag = ArgSpec::flag("verbose").with_short('v');
        assert!(!flag.matches("-vv"));
        assert!(!flag.matches("--verbose=true"));

        let file = ArgSpec::positional("file", ValueType::Path);
        assert!(!file.matches("--file"));
        assert_eq!(file.long_form(), None);
    }

    #[test]
    fn test_is_list() {
        assert!(ArgSpec::repeated("tag", ValueType::String).is_list());
        assert!(
            ArgSpec::positional("rest", ValueType::String)
                .collect_remaining()
                .is_list()
        );
        assert!(!ArgSpec::positional("file", ValueType::Path).is_list());
        assert!(!ArgSpec::single("name", ValueType::String).is_list());
    }

    #[test]
    fn test_value_name() {
        assert_eq!(
            ArgSpec::single("dry-run", ValueType::Bool).value_name(),
            "DRY_RUN"
        );
        assert_eq!(
            ArgSpec::single("größe", ValueType::Integer).value_name(),
            "GRÖSSE"
        );
    }

    #[test]
    fn test_subcommand_aliases() {
        let sub = SubcommandSpec::new("test").with_alias("t");
        assert!(sub.answers_to("test"));
        assert!(sub.answers_to("t"));
        assert!(!sub.answers_to("build"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let spec: ArgSpec = serde_json::from_str(r#"{"name": "name"}"#).unwrap();
        assert_eq!(spec.kind, ArgKind::Single);
        assert_eq!(spec.value_type, ValueType::String);
        assert!(!spec.required);
        assert!(!spec.collect_remaining);

        let choice: ArgSpec =
            serde_json::from_str(r#"{"name": "format", "value_type": {"choice": ["json", "yaml"]}}"#)
                .unwrap();
        assert_eq!(
            choice.value_type,
            ValueType::Choice(vec!["json".to_string(), "yaml".to_string()])
        );
    }
}
