//! Command Dispatcher: routes a [`ValidatedCommand`] to its action.
//!
//! The dispatcher is generic over the action error type `E`. Action
//! failures come back unchanged as [`DispatchError::Action`]; the dispatcher
//! only decides *which* action runs.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use swifty_gr_core::*;
//!
//! let schema = OptionSchema::builder("tool")
//!     .subcommand(SubcommandSpec::new("build"))
//!     .subcommand(SubcommandSpec::new("test"))
//!     .build()
//!     .unwrap();
//!
//! let mut dispatcher: Dispatcher<'_, std::io::Error> = Dispatcher::new();
//! dispatcher.register("build", |_cmd: &ValidatedCommand, out: &mut dyn Write| {
//!     writeln!(out, "building")
//! });
//! dispatcher.register("test", |_cmd: &ValidatedCommand, _out: &mut dyn Write| Ok(()));
//!
//! let mut out = Vec::new();
//! dispatcher.dispatch(&parse(&schema, ["build"]).unwrap(), &mut out).unwrap();
//! assert_eq!(out, b"building\n");
//!
//! let err = dispatcher
//!     .dispatch(&parse(&schema, ["deploy"]).unwrap(), &mut out)
//!     .unwrap_err();
//! assert!(matches!(err, DispatchError::UnknownCommand(ref name) if name == "deploy"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::ValidatedCommand;

/// An executable command implementation.
///
/// Actions write their normal output to the sink they are given and return
/// their own error type; they never touch process state directly.
pub trait Action<E> {
    fn run(&self, command: &ValidatedCommand, out: &mut dyn Write) -> Result<(), E>;
}

impl<E, F> Action<E> for F
where
    F: Fn(&ValidatedCommand, &mut dyn Write) -> Result<(), E>,
{
    fn run(&self, command: &ValidatedCommand, out: &mut dyn Write) -> Result<(), E> {
        self(command, out)
    }
}

/// Dispatch failure.
#[derive(Debug)]
pub enum DispatchError<E> {
    /// No action is registered under the command's subcommand name.
    UnknownCommand(String),
    /// The command names no subcommand and no default action is set.
    NoCommand,
    /// The action ran and failed; its error is passed through untouched.
    Action(E),
}

impl<E: fmt::Display> fmt::Display for DispatchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command '{name}'"),
            Self::NoCommand => f.write_str("no command given"),
            Self::Action(err) => err.fmt(f),
        }
    }
}

impl<E> std::error::Error for DispatchError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Action(err) => err.source(),
            _ => None,
        }
    }
}

/// Maps subcommand names to actions.
pub struct Dispatcher<'a, E> {
    actions: BTreeMap<String, Box<dyn Action<E> + 'a>>,
    default: Option<Box<dyn Action<E> + 'a>>,
}

impl<'a, E> Default for Dispatcher<'a, E> {
    fn default() -> Self {
        Self {
            actions: BTreeMap::new(),
            default: None,
        }
    }
}

impl<'a, E> Dispatcher<'a, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the action for a subcommand's canonical name, replacing any
    /// previous one.
    pub fn register(&mut self, name: &str, action: impl Action<E> + 'a) -> &mut Self {
        self.actions.insert(name.to_string(), Box::new(action));
        self
    }

    /// Sets the action used when the command names no subcommand, replacing
    /// any previous one.
    pub fn with_default(&mut self, action: impl Action<E> + 'a) -> &mut Self {
        self.default = Some(Box::new(action));
        self
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Resolves and runs the action for `command`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownCommand`] when no action matches,
    /// [`DispatchError::NoCommand`] when there is neither a subcommand nor a
    /// default action, and [`DispatchError::Action`] wrapping whatever the
    /// action returned.
    pub fn dispatch(
        &self,
        command: &ValidatedCommand,
        out: &mut dyn Write,
    ) -> Result<(), DispatchError<E>> {
        let action = match command.subcommand() {
            Some(name) => self
                .actions
                .get(name)
                .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?,
            None => self.default.as_ref().ok_or(DispatchError::NoCommand)?,
        };

        debug!(
            command = command.command(),
            subcommand = command.subcommand().unwrap_or("<default>"),
            "dispatching"
        );
        action.run(command, out).map_err(DispatchError::Action)
    }
}

impl<E> fmt::Debug for Dispatcher<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.names())
            .field("default", &self.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{ArgSpec, OptionSchema, SubcommandSpec, ValueType, parse};

    #[derive(Debug, PartialEq)]
    struct Boom(&'static str);

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom: {}", self.0)
        }
    }

    fn schema() -> OptionSchema {
        OptionSchema::builder("tool")
            .subcommand(
                SubcommandSpec::new("build")
                    .with_alias("b")
                    .with_arg(ArgSpec::single("target", ValueType::String)),
            )
            .subcommand(SubcommandSpec::new("test"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_dispatch_passes_values_to_action() {
        let schema = schema();
        let mut dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        dispatcher.register("build", |cmd: &ValidatedCommand, out: &mut dyn Write| {
            write!(out, "{}", cmd.string("target").unwrap_or("all")).map_err(|_| Boom("io"))
        });

        let mut out = Vec::new();
        let cmd = parse(&schema, ["b", "--target", "x86"]).unwrap();
        dispatcher.dispatch(&cmd, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x86");
    }

    #[test]
    fn test_unknown_command() {
        let schema = schema();
        let dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        let cmd = parse(&schema, ["deploy"]).unwrap();

        let err = dispatcher.dispatch(&cmd, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'deploy'");
    }

    #[test]
    fn test_declared_but_unregistered_is_unknown() {
        let schema = schema();
        let mut dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        dispatcher.register("build", |_: &ValidatedCommand, _: &mut dyn Write| Ok(()));

        let cmd = parse(&schema, ["test"]).unwrap();
        let err = dispatcher.dispatch(&cmd, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(ref n) if n == "test"));
    }

    #[test]
    fn test_action_error_propagates_unchanged() {
        let schema = schema();
        let mut dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        dispatcher.register("test", |_: &ValidatedCommand, _: &mut dyn Write| {
            Err(Boom("tests failed"))
        });

        let cmd = parse(&schema, ["test"]).unwrap();
        match dispatcher.dispatch(&cmd, &mut Vec::new()) {
            Err(DispatchError::Action(err)) => assert_eq!(err, Boom("tests failed")),
            other => panic!("expected action error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_action() {
        let schema =
            OptionSchema::build("greet", [ArgSpec::single("name", ValueType::String)]).unwrap();
        let calls = Cell::new(0);
        let mut dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        dispatcher.with_default(|_: &ValidatedCommand, _: &mut dyn Write| {
            calls.set(calls.get() + 1);
            Ok(())
        });

        let cmd = parse(&schema, ["--name", "ada"]).unwrap();
        dispatcher.dispatch(&cmd, &mut Vec::new()).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_register_and_default_chain() {
        let schema = schema();
        let mut dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        dispatcher
            .register("build", |_: &ValidatedCommand, out: &mut dyn Write| {
                out.write_all(b"build").map_err(|_| Boom("io"))
            })
            .with_default(|_: &ValidatedCommand, out: &mut dyn Write| {
                out.write_all(b"default").map_err(|_| Boom("io"))
            })
            .register("test", |_: &ValidatedCommand, out: &mut dyn Write| {
                out.write_all(b"test").map_err(|_| Boom("io"))
            });
        assert_eq!(dispatcher.names(), vec!["build", "test"]);

        let mut out = Vec::new();
        let none = parse(&schema, Vec::<&str>::new()).unwrap();
        dispatcher.dispatch(&none, &mut out).unwrap();
        let test = parse(&schema, ["test"]).unwrap();
        dispatcher.dispatch(&test, &mut out).unwrap();
        assert_eq!(out, b"defaulttest");
    }

    #[test]
    fn test_no_command_without_default() {
        let schema = schema();
        let dispatcher: Dispatcher<'_, Boom> = Dispatcher::new();
        let cmd = parse(&schema, Vec::<&str>::new()).unwrap();
        assert!(matches!(
            dispatcher.dispatch(&cmd, &mut Vec::new()),
            Err(DispatchError::NoCommand)
        ));
    }
}
