//! The Option Schema: building, validation at build time, and lookup.
//!
//! A [`SchemaDefinition`] is the plain, mutable description of a command
//! line (what a definition file deserializes into). Building it runs
//! [`validate_definition`] and yields an [`OptionSchema`], which is immutable
//! and is what the parser and usage renderer consume.

use serde::{Deserialize, Serialize};

use crate::validate::{SchemaError, validate_definition};
use crate::{ArgKind, ArgSpec, SubcommandSpec};

/// Unvalidated schema description.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::*;
///
/// let mut def = SchemaDefinition::new("greet");
/// def.args.push(ArgSpec::single("name", ValueType::String).required());
///
/// let schema = OptionSchema::try_from(def).unwrap();
/// assert_eq!(schema.command(), "greet");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Command name used in usage text.
    pub command: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Version reported by `--version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Global arguments, visible in every scope.
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    /// Subcommands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<SubcommandSpec>,
}

impl SchemaDefinition {
    /// Creates an empty definition for the given command name.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }
}

/// Validated, immutable Option Schema.
///
/// Obtain one through [`OptionSchema::builder`], [`OptionSchema::build`], or
/// by converting a [`SchemaDefinition`]. Deserializing an `OptionSchema`
/// directly also validates it.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::*;
///
/// let schema = OptionSchema::builder("tool")
///     .arg(ArgSpec::count("verbose").with_short('v'))
///     .subcommand(SubcommandSpec::new("build").with_arg(ArgSpec::flag("release")))
///     .subcommand(SubcommandSpec::new("test"))
///     .build()
///     .unwrap();
///
/// assert!(schema.lookup("verbose").is_ok());
/// assert_eq!(schema.subcommand_names(), vec!["build", "test"]);
/// assert!(schema.find_option("--release", schema.find_subcommand("build")).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDefinition", into = "SchemaDefinition")]
pub struct OptionSchema {
    def: SchemaDefinition,
}

impl OptionSchema {
    /// Starts a builder for the given command name.
    pub fn builder(command: &str) -> SchemaBuilder {
        SchemaBuilder {
            def: SchemaDefinition::new(command),
        }
    }

    /// Builds a schema without subcommands from a list of specifications.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, e.g.
    /// [`DuplicateArgument`](SchemaError::DuplicateArgument) when names
    /// collide or
    /// [`MultipleCollectRemaining`](SchemaError::MultipleCollectRemaining)
    /// when more than one positional collects the remaining tokens.
    pub fn build(
        command: &str,
        specs: impl IntoIterator<Item = ArgSpec>,
    ) -> Result<Self, SchemaError> {
        specs
            .into_iter()
            .fold(Self::builder(command), SchemaBuilder::arg)
            .build()
    }

    pub fn command(&self) -> &str {
        &self.def.command
    }

    pub fn description(&self) -> Option<&str> {
        self.def.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.def.version.as_deref()
    }

    /// Global arguments in declaration order.
    pub fn args(&self) -> &[ArgSpec] {
        &self.def.args
    }

    pub fn subcommands(&self) -> &[SubcommandSpec] {
        &self.def.subcommands
    }

    pub fn has_subcommands(&self) -> bool {
        !self.def.subcommands.is_empty()
    }

    pub fn subcommand_names(&self) -> Vec<&str> {
        self.def.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the underlying definition.
    pub fn definition(&self) -> &SchemaDefinition {
        &self.def
    }

    /// Looks up a global argument by name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] if no global argument has that name.
    pub fn lookup(&self, name: &str) -> Result<&ArgSpec, SchemaError> {
        self.def
            .args
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    /// Looks up an argument visible inside a subcommand: the subcommand's own
    /// arguments first, then the global ones.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] if the subcommand or the argument is unknown.
    pub fn lookup_in(&self, subcommand: &str, name: &str) -> Result<&ArgSpec, SchemaError> {
        let sub = self
            .find_subcommand(subcommand)
            .ok_or_else(|| SchemaError::NotFound(subcommand.to_string()))?;
        sub.args
            .iter()
            .find(|a| a.name == name)
            .map_or_else(|| self.lookup(name), Ok)
    }

    /// Finds a subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&SubcommandSpec> {
        self.def.subcommands.iter().find(|s| s.answers_to(name))
    }

    /// Finds the option matched by a `--long` or `-s` token in the given
    /// scope. Subcommand options are searched before global ones.
    pub fn find_option<'a>(
        &'a self,
        token: &str,
        scope: Option<&'a SubcommandSpec>,
    ) -> Option<&'a ArgSpec> {
        let scoped = scope.into_iter().flat_map(|s| s.args.iter());
        scoped
            .chain(self.def.args.iter())
            .find(|a| a.matches(token))
    }

    /// Iterates over the arguments visible in a scope, global first.
    pub fn visible_args<'a>(
        &'a self,
        scope: Option<&'a SubcommandSpec>,
    ) -> impl Iterator<Item = &'a ArgSpec> + 'a {
        self.def
            .args
            .iter()
            .chain(scope.into_iter().flat_map(|s| s.args.iter()))
    }

    /// Positionals bound in a scope: the subcommand's when one is selected,
    /// otherwise the global ones.
    pub fn positionals<'a>(
        &'a self,
        scope: Option<&'a SubcommandSpec>,
    ) -> Vec<&'a ArgSpec> {
        match scope {
            Some(sub) => sub.positionals().collect(),
            None => self
                .def
                .args
                .iter()
                .filter(|a| a.kind == ArgKind::Positional)
                .collect(),
        }
    }
}

impl TryFrom<SchemaDefinition> for OptionSchema {
    type Error = SchemaError;

    fn try_from(def: SchemaDefinition) -> Result<Self, Self::Error> {
        match validate_definition(&def).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(Self { def }),
        }
    }
}

impl From<OptionSchema> for SchemaDefinition {
    fn from(schema: OptionSchema) -> Self {
        schema.def
    }
}

/// Builder for [`OptionSchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    def: SchemaDefinition,
}

impl SchemaBuilder {
    pub fn description(mut self, desc: &str) -> Self {
        self.def.description = Some(desc.to_string());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.def.version = Some(version.to_string());
        self
    }

    /// Adds a global argument.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.def.args.push(spec);
        self
    }

    /// Adds a subcommand.
    pub fn subcommand(mut self, sub: SubcommandSpec) -> Self {
        self.def.subcommands.push(sub);
        self
    }

    /// Validates and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] reported by
    /// [`validate_definition`].
    pub fn build(self) -> Result<OptionSchema, SchemaError> {
        OptionSchema::try_from(self.def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueType;

    fn sample() -> OptionSchema {
        OptionSchema::builder("tool")
            .description("A sample tool")
            .version("1.2.3")
            .arg(ArgSpec::count("verbose").with_short('v'))
            .subcommand(
                SubcommandSpec::new("build")
                    .with_alias("b")
                    .with_arg(ArgSpec::single("target", ValueType::String).with_short('t'))
                    .with_arg(ArgSpec::positional("paths", ValueType::Path).collect_remaining()),
            )
            .subcommand(SubcommandSpec::new("test"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_rejects_name_collision() {
        let err = OptionSchema::build(
            "tool",
            [
                ArgSpec::single("name", ValueType::String),
                ArgSpec::single("name", ValueType::Integer),
            ],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateArgument("name".to_string()));
    }

    #[test]
    fn test_build_rejects_two_collectors() {
        let err = OptionSchema::build(
            "tool",
            [
                ArgSpec::positional("a", ValueType::String).collect_remaining(),
                ArgSpec::positional("b", ValueType::String).collect_remaining(),
            ],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::MultipleCollectRemaining("b".to_string()));
    }

    #[test]
    fn test_lookup() {
        let schema = sample();
        assert_eq!(schema.lookup("verbose").unwrap().short, Some('v'));
        assert_eq!(
            schema.lookup("target"),
            Err(SchemaError::NotFound("target".to_string()))
        );
        assert_eq!(schema.lookup_in("build", "target").unwrap().name, "target");
        assert_eq!(schema.lookup_in("b", "verbose").unwrap().name, "verbose");
        assert_eq!(
            schema.lookup_in("deploy", "target"),
            Err(SchemaError::NotFound("deploy".to_string()))
        );
    }

    #[test]
    fn test_find_option_respects_scope() {
        let schema = sample();
        let build = schema.find_subcommand("build");

        assert!(schema.find_option("-t", build).is_some());
        assert!(schema.find_option("-t", None).is_none());
        assert!(schema.find_option("-v", build).is_some());
        assert!(schema.find_option("--paths", build).is_none());
    }

    #[test]
    fn test_positionals_by_scope() {
        let schema = sample();
        assert!(schema.positionals(None).is_empty());
        let build = schema.positionals(schema.find_subcommand("build"));
        assert_eq!(build.len(), 1);
        assert_eq!(build[0].name, "paths");
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = r#"{"command": "tool", "args": [{"name": "x"}, {"name": "x"}]}"#;
        assert!(serde_json::from_str::<OptionSchema>(bad).is_err());

        let good = r#"{"command": "tool", "args": [{"name": "x"}]}"#;
        let schema: OptionSchema = serde_json::from_str(good).unwrap();
        assert_eq!(schema.args().len(), 1);
    }

    #[test]
    fn test_serialize_matches_definition() {
        let schema = sample();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["command"], "tool");
        assert_eq!(json["version"], "1.2.3");
        assert_eq!(json["subcommands"][0]["aliases"][0], "b");
    }
}
