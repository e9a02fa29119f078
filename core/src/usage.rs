//! Human-readable usage text rendered from an [`OptionSchema`].

use crate::{ArgKind, ArgSpec, OptionSchema, SubcommandSpec, ValueType};

/// One-line usage summary for a scope.
///
/// # Examples
///
/// ```
/// use swifty_gr_core::*;
///
/// let schema = OptionSchema::build(
///     "greet",
///     [
///         ArgSpec::single("name", ValueType::String).required(),
///         ArgSpec::positional("extra", ValueType::String).collect_remaining(),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(
///     usage_line(&schema, None),
///     "Usage: greet --name <NAME> [OPTIONS] [EXTRA]..."
/// );
/// ```
pub fn usage_line(schema: &OptionSchema, subcommand: Option<&str>) -> String {
    let scope = subcommand.and_then(|name| schema.find_subcommand(name));
    let mut parts = vec![schema.command().to_string()];
    if let Some(sub) = scope {
        parts.push(sub.name.clone());
    }

    for spec in schema
        .visible_args(scope)
        .filter(|a| a.kind.is_option() && a.required)
    {
        parts.push(format!("--{} <{}>", spec.name, spec.value_name()));
    }
    parts.push("[OPTIONS]".to_string());

    for spec in schema.positionals(scope) {
        let mut part = if spec.required {
            format!("<{}>", spec.value_name())
        } else {
            format!("[{}]", spec.value_name())
        };
        if spec.collect_remaining {
            part.push_str("...");
        }
        parts.push(part);
    }

    if scope.is_none() && schema.has_subcommands() {
        parts.push("<COMMAND>".to_string());
    }

    format!("Usage: {}", parts.join(" "))
}

/// Full help text for the whole schema or one subcommand.
///
/// Unknown subcommand names fall back to the top-level help.
pub fn render_usage(schema: &OptionSchema, subcommand: Option<&str>) -> String {
    let scope = subcommand.and_then(|name| schema.find_subcommand(name));
    let mut out = String::new();

    let description = match scope {
        Some(sub) => sub.description.as_deref(),
        None => schema.description(),
    };
    if let Some(desc) = description {
        out.push_str(desc);
        out.push_str("\n\n");
    }

    out.push_str(&usage_line(schema, scope.map(|s| s.name.as_str())));
    out.push('\n');

    let positionals: Vec<(String, String)> = schema
        .positionals(scope)
        .into_iter()
        .map(|spec| (positional_label(spec), describe(spec)))
        .collect();
    push_section(&mut out, "Arguments", &positionals);

    let mut options: Vec<(String, String)> = schema
        .visible_args(scope)
        .filter(|a| a.kind.is_option())
        .map(|spec| (option_label(spec), describe(spec)))
        .collect();
    options.push(("-h, --help".to_string(), "Print help".to_string()));
    if scope.is_none() && schema.version().is_some() {
        options.push(("-V, --version".to_string(), "Print version".to_string()));
    }
    push_section(&mut out, "Options", &options);

    if scope.is_none() {
        let commands: Vec<(String, String)> = schema
            .subcommands()
            .iter()
            .map(|sub| (sub.name.clone(), describe_subcommand(sub)))
            .collect();
        push_section(&mut out, "Commands", &commands);
    }

    out
}

fn push_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");
    for (label, desc) in rows {
        if desc.is_empty() {
            out.push_str(&format!("  {label}\n"));
        } else {
            out.push_str(&format!("  {label:<width$}  {desc}\n"));
        }
    }
}

fn option_label(spec: &ArgSpec) -> String {
    let long = format!("--{}", spec.name);
    let mut label = match spec.short {
        Some(short) => format!("-{short}, {long}"),
        None => format!("    {long}"),
    };
    match spec.kind {
        ArgKind::Single | ArgKind::Repeated => {
            label.push_str(&format!(" <{}>", spec.value_name()));
        }
        _ => {}
    }
    if matches!(spec.kind, ArgKind::Count | ArgKind::Repeated) {
        label.push_str("...");
    }
    label
}

fn positional_label(spec: &ArgSpec) -> String {
    let mut label = if spec.required {
        format!("<{}>", spec.value_name())
    } else {
        format!("[{}]", spec.value_name())
    };
    if spec.collect_remaining {
        label.push_str("...");
    }
    label
}

fn describe(spec: &ArgSpec) -> String {
    let mut parts = Vec::new();
    if let Some(desc) = &spec.description {
        parts.push(desc.clone());
    }
    if let ValueType::Choice(choices) = &spec.value_type {
        if spec.kind.takes_value() {
            parts.push(format!("[possible values: {}]", choices.join(", ")));
        }
    }
    if let Some(default) = &spec.default {
        parts.push(format!("[default: {default}]"));
    }
    parts.join(" ")
}

fn describe_subcommand(sub: &SubcommandSpec) -> String {
    let mut desc = sub.description.clone().unwrap_or_default();
    if !sub.aliases.is_empty() {
        if !desc.is_empty() {
            desc.push(' ');
        }
        desc.push_str(&format!("[aliases: {}]", sub.aliases.join(", ")));
    }
    desc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OptionSchema {
        OptionSchema::builder("tool")
            .description("Does tool things")
            .version("0.1.0")
            .arg(
                ArgSpec::count("verbose")
                    .with_short('v')
                    .with_description("More output"),
            )
            .arg(
                ArgSpec::single("format", ValueType::Choice(vec!["json".into(), "text".into()]))
                    .with_default("text"),
            )
            .subcommand(
                SubcommandSpec::new("build")
                    .with_description("Build things")
                    .with_alias("b")
                    .with_arg(ArgSpec::single("target", ValueType::String).required())
                    .with_arg(ArgSpec::positional("paths", ValueType::Path).collect_remaining()),
            )
            .subcommand(SubcommandSpec::new("test"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_usage_line_top_level() {
        assert_eq!(
            usage_line(&schema(), None),
            "Usage: tool [OPTIONS] <COMMAND>"
        );
    }

    #[test]
    fn test_usage_line_subcommand() {
        assert_eq!(
            usage_line(&schema(), Some("b")),
            "Usage: tool build --target <TARGET> [OPTIONS] [PATHS]..."
        );
    }

    #[test]
    fn test_render_top_level() {
        let text = render_usage(&schema(), None);
        let expected = "\
Does tool things

Usage: tool [OPTIONS] <COMMAND>

Options:
  -v, --verbose...       More output
      --format <FORMAT>  [possible values: json, text] [default: text]
  -h, --help             Print help
  -V, --version          Print version

Commands:
  build  Build things [aliases: b]
  test
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_subcommand() {
        let text = render_usage(&schema(), Some("build"));
        assert!(text.starts_with("Build things\n\nUsage: tool build"));
        assert!(text.contains("Arguments:\n  [PATHS]...\n"));
        assert!(text.contains("--target <TARGET>"));
        assert!(text.contains("--verbose"));
        assert!(!text.contains("Commands:"));
        assert!(!text.contains("--version"));
    }

    #[test]
    fn test_columns_align_with_non_ascii_names() {
        let schema = OptionSchema::build(
            "pack",
            [
                ArgSpec::single("größe", ValueType::Integer).with_description("Box size"),
                ArgSpec::flag("quiet").with_description("No output"),
            ],
        )
        .unwrap();
        let text = render_usage(&schema, None);

        assert!(text.contains("--größe <GRÖSSE>"));
        let column = |needle: &str| {
            let line = text.lines().find(|l| l.contains(needle)).unwrap();
            line.chars().count() - needle.chars().count()
        };
        assert_eq!(column("Box size"), column("No output"));
        assert_eq!(column("Box size"), column("Print help"));
    }
}
