//! Console commands
//!
//! Maps a token sequence onto one of the fixed console commands,
//! enforcing each command's minimum arity.

use crate::error::{ConsoleError, Result};
use super::parser::{join_value, tokenize};
use super::INVALID_COMMAND;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Print the command summary
    Help,

    /// Write a key
    Set { key: String, value: String },

    /// Read a key
    Get { key: String },

    /// Remove a key
    Delete { key: String },

    /// Print every stored entry
    List,

    /// Leave the console
    Exit,
}

impl ConsoleCommand {
    /// Parse one raw input line
    pub fn from_line(line: &str) -> Result<Self> {
        Self::parse(&tokenize(line))
    }

    /// Parse a token sequence
    ///
    /// Returns [`ConsoleError::Usage`] carrying the exact notice to print
    /// for empty input, unknown commands and missing arguments.
    pub fn parse(tokens: &[&str]) -> Result<Self> {
        let (name, args) = match tokens.split_first() {
            Some((name, args)) => (*name, args),
            None => return Err(ConsoleError::Usage(INVALID_COMMAND.to_string())),
        };

        match name {
            "help" => Ok(ConsoleCommand::Help),
            "set" => match args {
                [key, value @ ..] if !value.is_empty() => Ok(ConsoleCommand::Set {
                    key: key.to_string(),
                    value: join_value(value),
                }),
                _ => Err(usage("set <key> <value>")),
            },
            "get" => match args.first() {
                Some(key) => Ok(ConsoleCommand::Get { key: key.to_string() }),
                None => Err(usage("get <key>")),
            },
            "delete" => match args.first() {
                Some(key) => Ok(ConsoleCommand::Delete { key: key.to_string() }),
                None => Err(usage("delete <key>")),
            },
            "list" => {
                if !args.is_empty() {
                    tracing::debug!("list ignores {} extra argument(s)", args.len());
                }
                Ok(ConsoleCommand::List)
            }
            "exit" => Ok(ConsoleCommand::Exit),
            other => Err(ConsoleError::Usage(format!(
                "Unknown command: {}. Type 'help' for a list of commands.",
                other
            ))),
        }
    }
}

fn usage(synopsis: &str) -> ConsoleError {
    ConsoleError::Usage(format!("Usage: {}", synopsis))
}
