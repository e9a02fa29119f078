//! Option schemas, argument parsing and command dispatch.
//!
//! This crate is the pure core of the `swifty-gr` command line:
//!
//! - [`OptionSchema`]: a validated, immutable description of accepted
//!   flags, options, positionals and subcommands, built with
//!   [`OptionSchema::builder`] or loaded from a definition file
//!   ([`load_schema`]).
//! - [`parse`] / [`Parser`]: turns raw arguments into a
//!   [`ValidatedCommand`] or a [`ParseError`].
//! - [`Dispatcher`]: routes a [`ValidatedCommand`] to the [`Action`]
//!   registered for its subcommand.
//! - [`render_usage`] / [`usage_line`]: help text for a schema.
//!
//! Nothing here touches process state: arguments come in as parameters and
//! output goes to a caller-provided writer.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use swifty_gr_core::*;
//!
//! let schema = OptionSchema::builder("greet")
//!     .arg(ArgSpec::single("name", ValueType::String).with_short('n').required())
//!     .arg(ArgSpec::flag("loud"))
//!     .build()
//!     .unwrap();
//!
//! let command = parse(&schema, ["-n", "ada", "--loud"]).unwrap();
//!
//! let mut dispatcher: Dispatcher<'_, std::io::Error> = Dispatcher::new();
//! dispatcher.with_default(|cmd: &ValidatedCommand, out: &mut dyn Write| {
//!     let name = cmd.string("name").unwrap_or("world");
//!     if cmd.flag("loud") {
//!         writeln!(out, "HELLO, {}!", name.to_uppercase())
//!     } else {
//!         writeln!(out, "hello, {name}")
//!     }
//! });
//!
//! let mut out = Vec::new();
//! dispatcher.dispatch(&command, &mut out).unwrap();
//! assert_eq!(out, b"HELLO, ADA!\n");
//! ```

mod command;
mod dispatch;
mod load;
mod parse;
mod schema;
mod types;
mod usage;
mod validate;
mod value;

pub use command::ValidatedCommand;
pub use dispatch::{Action, DispatchError, Dispatcher};
pub use load::{
    LoadError, check_definition, load_definition, load_schema, schema_from_json_str,
    schema_from_yaml_str,
};
pub use parse::{ParseError, Parser, parse};
pub use schema::{OptionSchema, SchemaBuilder, SchemaDefinition};
pub use types::{ArgKind, ArgSpec, SubcommandSpec, ValueType};
pub use usage::{render_usage, usage_line};
pub use validate::{RESERVED_NAMES, RESERVED_SHORTS, SchemaError, validate_definition};
pub use value::Value;
