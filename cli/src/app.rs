//! Entry point logic: parse the process arguments against the tool schema,
//! resolve settings, dispatch, and map the outcome to an exit code.

use std::io::Write;

use swifty_gr_core::{DispatchError, OptionSchema, ParseError, parse, render_usage, usage_line};
use tracing::debug;

use crate::config::{Environment, Settings};
use crate::error::CliError;
use crate::{exitcode, logging, tool};

/// Runs one invocation. `argv[0]` is the program name.
///
/// Normal output goes to `out`; diagnostics, help and version text go to
/// `err`.
pub fn run(argv: &[String], env: &Environment, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    let schema = match tool::schema() {
        Ok(schema) => schema,
        Err(e) => return report(err, &CliError::BuiltinSchema(e)),
    };

    let args = argv.get(1..).unwrap_or_default();
    let command = match parse(&schema, args) {
        Ok(command) => command,
        Err(e) => return report_parse(err, &schema, args, &e),
    };

    let settings = match Settings::resolve(&command, env) {
        Ok(settings) => settings,
        Err(e) => return report(err, &e),
    };
    logging::init(&settings, env);
    debug!(?command, ?settings, "invocation parsed");

    let dispatcher = tool::dispatcher(&schema, &settings);
    match dispatcher.dispatch(&command, out) {
        Ok(()) => exitcode::OK,
        Err(DispatchError::UnknownCommand(name)) => {
            let _ = writeln!(err, "error: unknown command '{name}'\n");
            let _ = writeln!(err, "{}\n", usage_line(&schema, None));
            let _ = writeln!(err, "For more information, try '--help'.");
            exitcode::USAGE
        }
        Err(DispatchError::NoCommand) => {
            let _ = write!(err, "{}", render_usage(&schema, None));
            exitcode::USAGE
        }
        Err(DispatchError::Action(e)) => report(err, &e),
    }
}

fn report(err: &mut dyn Write, error: &CliError) -> i32 {
    let _ = writeln!(err, "error: {error}");
    for detail in error.details() {
        let _ = writeln!(err, "  - {detail}");
    }
    error.exit_code()
}

fn report_parse(
    err: &mut dyn Write,
    schema: &OptionSchema,
    args: &[String],
    error: &ParseError,
) -> i32 {
    match error {
        ParseError::HelpRequested { subcommand } => {
            let _ = write!(err, "{}", render_usage(schema, subcommand.as_deref()));
            exitcode::OK
        }
        ParseError::VersionRequested => {
            let _ = writeln!(
                err,
                "{} {}",
                schema.command(),
                schema.version().unwrap_or_default()
            );
            exitcode::OK
        }
        _ => {
            let _ = writeln!(err, "error: {error}\n");
            let _ = writeln!(err, "{}\n", usage_line(schema, subcommand_in(schema, args)));
            let _ = writeln!(err, "For more information, try '--help'.");
            exitcode::USAGE
        }
    }
}

/// Canonical name of the subcommand named in `args`, if any. Scans global
/// options the same way the parser does, skipping their values.
fn subcommand_in<'s>(schema: &'s OptionSchema, args: &[String]) -> Option<&'s str> {
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        if token == "--" {
            return None;
        }
        if token.len() > 1 && token.starts_with('-') {
            let takes_value = !token.contains('=')
                && schema
                    .find_option(token, None)
                    .is_some_and(|spec| spec.kind.takes_value());
            if takes_value {
                tokens.next();
            }
            continue;
        }
        return schema.find_subcommand(token).map(|sub| sub.name.as_str());
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    struct Outcome {
        code: i32,
        stdout: String,
        stderr: String,
    }

    fn run_with(env: &Environment, args: &[&str]) -> Outcome {
        let argv: Vec<String> = std::iter::once(tool::NAME)
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&argv, env, &mut out, &mut err);
        Outcome {
            code,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
        }
    }

    fn run_args(args: &[&str]) -> Outcome {
        run_with(&Environment::default(), args)
    }

    fn write_schema(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    const GREET: &str = "\
command: greet
version: \"2.0\"
args:
  - name: name
    short: n
    required: true
  - name: loud
    kind: flag
";

    const TOOL: &str = "\
command: tool
subcommands:
  - name: build
    args:
      - name: release
        kind: flag
  - name: test
";

    #[test]
    fn test_no_arguments_prints_usage() {
        let outcome = run_args(&[]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.contains("Usage: swifty-gr [OPTIONS] <COMMAND>"));
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_help_and_version() {
        let help = run_args(&["--help"]);
        assert_eq!(help.code, exitcode::OK);
        assert!(help.stderr.contains("Commands:"));
        assert!(help.stderr.contains("check"));

        let sub_help = run_args(&["parse", "-h"]);
        assert_eq!(sub_help.code, exitcode::OK);
        assert!(sub_help.stderr.contains("Usage: swifty-gr parse"));

        let version = run_args(&["-V"]);
        assert_eq!(version.code, exitcode::OK);
        assert_eq!(
            version.stderr,
            format!("swifty-gr {}\n", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_bad_tool_arguments() {
        let outcome = run_args(&["--bogus", "schema"]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.starts_with("error: unknown argument '--bogus'"));
        assert!(outcome.stderr.contains("try '--help'"));

        let outcome = run_args(&["--format", "xml", "schema"]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.contains("expected one of: json, yaml, text"));
    }

    #[test]
    fn test_parse_error_shows_subcommand_usage() {
        let outcome = run_args(&["check"]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.starts_with("error: missing required argument(s): schema"));
        assert!(outcome.stderr.contains("Usage: swifty-gr check [OPTIONS] <SCHEMA>\n"));

        let outcome = run_args(&["--format", "json", "help-for", "tool.yaml", "--bogus"]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.contains("Usage: swifty-gr usage [OPTIONS] <SCHEMA>\n"));

        let outcome = run_args(&["--bogus"]);
        assert!(outcome.stderr.contains("Usage: swifty-gr [OPTIONS] <COMMAND>\n"));
    }

    #[test]
    fn test_unknown_command() {
        let outcome = run_args(&["deploy"]);
        assert_eq!(outcome.code, exitcode::USAGE);
        assert!(outcome.stderr.starts_with("error: unknown command 'deploy'"));
    }

    #[test]
    fn test_schema_json() {
        let outcome = run_args(&["--format", "json", "schema"]);
        assert_eq!(outcome.code, exitcode::OK);
        let json: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
        assert_eq!(json["command"], "swifty-gr");
        assert_eq!(json["subcommands"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_against_user_schema() {
        let dir = tempfile::tempdir().unwrap();
        let greet = write_schema(dir.path(), "greet.yaml", GREET);

        let ok = run_args(&["parse", greet.as_str(), "--", "--name", "ada", "--loud"]);
        assert_eq!(ok.code, exitcode::OK, "stderr: {}", ok.stderr);
        assert_eq!(ok.stdout, "greet\n  loud: true\n  name: ada\n");

        let missing = run_args(&["parse", greet.as_str()]);
        assert_eq!(missing.code, exitcode::DATAERR);
        assert!(missing.stderr.contains("missing required argument(s): name"));

        let version = run_args(&["parse", greet.as_str(), "--", "--version"]);
        assert_eq!(version.code, exitcode::OK);
        assert_eq!(version.stdout, "greet 2.0\n");
    }

    #[test]
    fn test_parse_version_of_unversioned_schema() {
        let dir = tempfile::tempdir().unwrap();
        let tool_file = write_schema(dir.path(), "tool.yaml", TOOL);

        let outcome = run_args(&["parse", tool_file.as_str(), "--", "--version"]);
        assert_eq!(outcome.code, exitcode::DATAERR);
        assert!(outcome.stderr.contains("unknown argument '--version'"));
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_parse_undeclared_subcommand() {
        let dir = tempfile::tempdir().unwrap();
        let tool_file = write_schema(dir.path(), "tool.yaml", TOOL);

        let outcome = run_args(&["parse", tool_file.as_str(), "--", "deploy"]);
        assert_eq!(outcome.code, exitcode::DATAERR);
        assert!(outcome.stderr.contains("unknown command 'deploy'"));

        let outcome = run_args(&[
            "--format",
            "json",
            "parse",
            tool_file.as_str(),
            "--",
            "build",
            "--release",
        ]);
        assert_eq!(outcome.code, exitcode::OK);
        let json: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
        assert_eq!(json["subcommand"], "build");
        assert_eq!(json["values"]["release"], true);
    }

    #[test]
    fn test_check_reports_every_problem() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_schema(
            dir.path(),
            "bad.yaml",
            "command: tool\nargs:\n  - name: help\n  - name: a\n  - name: a\n",
        );

        let outcome = run_args(&["check", bad.as_str()]);
        assert_eq!(outcome.code, exitcode::DATAERR);
        assert!(outcome.stderr.contains("(2 problem(s))"));
        assert!(outcome.stderr.contains("  - reserved argument name: help"));

        let good = write_schema(dir.path(), "tool.yaml", TOOL);
        let outcome = run_args(&["check", good.as_str()]);
        assert_eq!(outcome.code, exitcode::OK);
        assert_eq!(
            outcome.stdout,
            "ok: schema 'tool' (1 argument(s), 2 subcommand(s))\n"
        );
    }

    #[test]
    fn test_missing_schema_file() {
        let outcome = run_args(&["check", "/definitely/not/here.yaml"]);
        assert_eq!(outcome.code, exitcode::NOINPUT);
        assert!(outcome.stderr.starts_with("error: failed to load schema"));
    }

    #[test]
    fn test_usage_for_subcommand() {
        let dir = tempfile::tempdir().unwrap();
        let tool_file = write_schema(dir.path(), "tool.yml", TOOL);

        let outcome = run_args(&["usage", tool_file.as_str(), "--subcommand", "build"]);
        assert_eq!(outcome.code, exitcode::OK);
        assert!(outcome.stdout.starts_with("Usage: tool build [OPTIONS]"));

        let outcome = run_args(&["usage", tool_file.as_str(), "-s", "deploy"]);
        assert_eq!(outcome.code, exitcode::DATAERR);
    }

    #[test]
    fn test_config_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "format: yaml\n").unwrap();
        let env = Environment {
            config_path: Some(config),
            log_filter: None,
        };

        let outcome = run_with(&env, &["schema"]);
        assert_eq!(outcome.code, exitcode::OK);
        assert!(outcome.stdout.starts_with("command: swifty-gr\n"));

        let missing = Environment {
            config_path: Some(dir.path().join("absent.yaml")),
            log_filter: None,
        };
        let outcome = run_with(&missing, &["schema"]);
        assert_eq!(outcome.code, exitcode::NOINPUT);
    }
}
