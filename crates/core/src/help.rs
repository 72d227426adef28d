//! Context-sensitive usage text.
//!
//! Usage is rendered for a position in the tree, given as the chain of nodes
//! from the root to the current command. The same function serves `--help`,
//! the `help` command and the usage printed alongside parse errors.

use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::command_definitions::{App, CommandDef, FlagDef, Value, ValueKind};

const INDENT: &str = "  ";
const COLUMN_GAP: usize = 3;
/// Help columns narrower than this are not wrapped.
const MIN_WRAP_COLUMN: usize = 20;

/// Renders usage for the end of `nodes`, wrapping at the configured width.
#[must_use]
pub fn render_usage(app: &App, nodes: &[&CommandDef]) -> String {
    render_usage_with_width(app, nodes, app.help_options.wrap_width())
}

/// Renders usage for the end of `nodes`, wrapping at `width` when given.
#[must_use]
pub fn render_usage_with_width(app: &App, nodes: &[&CommandDef], width: Option<usize>) -> String {
    let Some(node) = nodes.last() else {
        return render_usage_with_width(app, &[&app.root], width);
    };

    let path = nodes.iter().map(|node| node.name.as_str()).join(" ");
    let mut sections = vec![format!("Usage: {path} {}", usage_suffix(nodes))];

    if !node.help.is_empty() {
        sections.push(wrap(&node.help, width).join("\n"));
    }

    let commands = commands_section(app, node, width);
    let flags = flags_section(app, nodes, width);
    if app.help_options.flags_last {
        sections.extend(commands);
        sections.push(flags);
    } else {
        sections.push(flags);
        sections.extend(commands);
    }

    if !node.subcommands.is_empty() {
        sections.push(format!(
            "Run \"{path} <command> --help\" for more information on a command."
        ));
    }

    let mut usage = sections.join("\n\n");
    usage.push('\n');
    usage
}

/// `--required=X ... <command> [flags]` for the command at the end of `nodes`.
fn usage_suffix(nodes: &[&CommandDef]) -> String {
    let mut parts: Vec<String> = nodes
        .iter()
        .flat_map(|node| node.flags.values())
        .filter(|flag| flag.required)
        .map(FlagDef::usage_form)
        .collect();

    if nodes
        .last()
        .is_some_and(|node| !node.behavior.is_terminal())
    {
        parts.push("<command>".to_string());
    }
    parts.push("[flags]".to_string());
    parts.join(" ")
}

fn commands_section(app: &App, node: &CommandDef, width: Option<usize>) -> Option<String> {
    let mut leaves = Vec::new();
    collect_leaves(node, &mut Vec::new(), &mut leaves);
    if leaves.is_empty() {
        return None;
    }

    let body = if app.help_options.compact {
        let rows: Vec<(String, String)> = leaves
            .iter()
            .map(|chain| {
                let name = chain.iter().map(|command| command.name.as_str()).join(" ");
                let help = chain.last().map_or("", |command| command.help.as_str());
                (format!("{INDENT}{name}"), help.to_string())
            })
            .collect();
        table(&rows, width)
    } else {
        leaves
            .iter()
            .map(|chain| {
                let name = chain.iter().map(|command| command.name.as_str()).join(" ");
                let mut entry = vec![format!("{INDENT}{name} {}", usage_suffix(chain))];
                if let Some(command) = chain.last().filter(|command| !command.help.is_empty()) {
                    let help_width = width.map(|width| width.saturating_sub(2 * INDENT.len()));
                    entry.extend(
                        wrap(&command.help, help_width)
                            .into_iter()
                            .map(|line| format!("{INDENT}{INDENT}{line}")),
                    );
                }
                entry.join("\n")
            })
            .join("\n\n")
    };

    Some(format!("Commands:\n{body}"))
}

/// Every terminal command below `node`, as the chain of commands leading to it.
fn collect_leaves<'a>(
    node: &'a CommandDef,
    chain: &mut Vec<&'a CommandDef>,
    leaves: &mut Vec<Vec<&'a CommandDef>>,
) {
    for command in node.subcommands.values() {
        chain.push(command);
        if command.behavior.is_terminal() {
            leaves.push(chain.clone());
        } else {
            collect_leaves(command, chain, leaves);
        }
        chain.pop();
    }
}

fn flags_section(app: &App, nodes: &[&CommandDef], width: Option<usize>) -> String {
    let groups: Vec<Vec<(String, String)>> = app
        .flags_in_scope(nodes)
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| group.into_iter().map(flag_row).collect())
        .collect();

    // All groups share one column so the help text lines up.
    let column = groups
        .iter()
        .flatten()
        .map(|(left, _)| left.width())
        .max()
        .unwrap_or(0);

    let body = groups
        .iter()
        .map(|rows| table_with_column(rows, column, width))
        .join("\n\n");

    format!("Flags:\n{body}")
}

fn flag_row(flag: &FlagDef) -> (String, String) {
    let short = flag
        .short
        .map_or_else(|| "    ".to_string(), |short| format!("-{short}, "));
    let left = format!("{INDENT}{short}{}", flag.usage_form());

    let help = match &flag.default {
        Some(Value::Bool(_)) | None => flag.help.clone(),
        Some(default) if flag.kind == ValueKind::List && default.to_string().is_empty() => {
            flag.help.clone()
        }
        Some(default) => format!("{} (default: {default})", flag.help)
            .trim_start()
            .to_string(),
    };
    (left, help)
}

fn table(rows: &[(String, String)], width: Option<usize>) -> String {
    let column = rows.iter().map(|(left, _)| left.width()).max().unwrap_or(0);
    table_with_column(rows, column, width)
}

fn table_with_column(rows: &[(String, String)], column: usize, width: Option<usize>) -> String {
    let offset = column + COLUMN_GAP;
    let help_width = width
        .map(|width| width.saturating_sub(offset))
        .filter(|help_width| *help_width >= MIN_WRAP_COLUMN);

    rows.iter()
        .map(|(left, help)| {
            let mut lines = wrap(help, help_width).into_iter();
            let first = lines.next().unwrap_or_default();
            let mut row = left.clone();
            if !first.is_empty() {
                row.push_str(&" ".repeat(offset.saturating_sub(left.width())));
                row.push_str(&first);
            }
            for line in lines {
                row.push('\n');
                row.push_str(&" ".repeat(offset));
                row.push_str(&line);
            }
            row
        })
        .join("\n")
}

/// Greedy word wrap by display width; explicit newlines are kept and `None`
/// disables wrapping.
#[must_use]
pub fn wrap(text: &str, width: Option<usize>) -> Vec<String> {
    let Some(width) = width else {
        return text.lines().map(str::to_string).collect();
    };

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if !line.is_empty() && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines
}
