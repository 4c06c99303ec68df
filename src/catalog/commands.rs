//! # Shell Commands
//!
//! Parses the line-oriented commands accepted by the catalog shell.

use crate::catalog::controllers::FormField;
use anyhow::{anyhow, bail, Result};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    Search(String),
    Open(i64),
    New,
    /// Edit by id from the list, or the shown interface from the detail view
    Edit(Option<i64>),
    /// Delete by id from the list, or the shown interface from the detail view
    Delete(Option<i64>),
    Set { field: FormField, value: String },
    ToggleActive,
    Save,
    Cancel,
    Back,
    Large,
    Info,
    Help,
    Quit,
}

/// Usage lines printed by `help`
pub const HELP_TEXT: &str = "\
Commands:
  list                  show all interfaces
  search <term>         filter the list by name, type or description
  open <id>             show one interface and its endpoints
  new                   open an empty form
  edit [id]             edit an interface
  delete [id]           delete an interface (asks first)
  set <field> <value>   change a form field (name, type, base_url, description, auth_type, active)
  toggle active         flip the active flag on the form
  save                  submit the form
  cancel                leave the form without saving
  back                  return to the list
  large                 list interfaces with more than five endpoints
  info                  show backend information
  help                  show this help
  quit                  leave the shell";

fn parse_id(command: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| anyhow!("'{}' expects a numeric id, got '{}'", command, raw))
}

fn optional_id(command: &str, rest: &str) -> Result<Option<i64>> {
    if rest.is_empty() {
        Ok(None)
    } else {
        parse_id(command, rest).map(Some)
    }
}

impl ShellCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "search" | "find" => ShellCommand::Search(rest.to_string()),
            "open" | "show" => {
                if rest.is_empty() {
                    bail!("'open' needs an id");
                }
                ShellCommand::Open(parse_id("open", rest)?)
            }
            "new" | "create" => ShellCommand::New,
            "edit" => ShellCommand::Edit(optional_id("edit", rest)?),
            "delete" | "rm" => ShellCommand::Delete(optional_id("delete", rest)?),
            "set" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(name, value)| (name, value.trim()))
                    .unwrap_or((rest, ""));
                if name.is_empty() {
                    bail!("'set' needs a field name");
                }
                let field = FormField::parse(name)
                    .ok_or_else(|| anyhow!("Unknown field '{}'", name))?;
                ShellCommand::Set {
                    field,
                    value: value.to_string(),
                }
            }
            "toggle" => match rest.to_lowercase().as_str() {
                "active" | "is_active" => ShellCommand::ToggleActive,
                _ => bail!("Only 'toggle active' is supported"),
            },
            "save" | "submit" => ShellCommand::Save,
            "cancel" => ShellCommand::Cancel,
            "back" => ShellCommand::Back,
            "large" => ShellCommand::Large,
            "info" => ShellCommand::Info,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => bail!("Unknown command '{}', type 'help' for a list", other),
        };
        Ok(Some(command))
    }
}
