//! Shell commands read from stdin and their parsing.

use anyhow::{anyhow, bail, Context, Result};
use shared::domain::{ElementField, ElementId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Edit { id: ElementId, field: ElementField },
    Select(ElementId),
    Reload,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ShellCommand::List => "list",
            ShellCommand::Search(_) => "search",
            ShellCommand::Edit { .. } => "edit",
            ShellCommand::Select(_) => "select",
            ShellCommand::Reload => "reload",
            ShellCommand::Help => "help",
            ShellCommand::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  list                  show the filtered table
  search <text>         filter rows (applied after the search debounce)
  edit <id> <field>     edit position, name, weight or symbol of a row
  select <id>           mark a row as selected
  reload                fetch the dataset again
  quit                  exit";

/// `None` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (trimmed, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        // everything after the verb, spaces included, is the search text
        "search" | "/" => ShellCommand::Search(rest.to_string()),
        "edit" => {
            let mut args = rest.split_whitespace();
            let id = parse_id(args.next())?;
            let field = args
                .next()
                .ok_or_else(|| anyhow!("usage: edit <id> <field>"))?
                .parse::<ElementField>()?;
            ShellCommand::Edit { id, field }
        }
        "select" => ShellCommand::Select(parse_id(rest.split_whitespace().next())?),
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => bail!("unknown command '{other}'; type 'help'"),
    };
    Ok(Some(command))
}

fn parse_id(raw: Option<&str>) -> Result<ElementId> {
    let raw = raw.ok_or_else(|| anyhow!("missing element id"))?;
    raw.parse::<i64>()
        .map(ElementId)
        .with_context(|| format!("invalid element id '{raw}'"))
}
