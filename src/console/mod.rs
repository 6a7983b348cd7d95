//! Console Module
//!
//! The interactive front end: turns input lines into store calls and
//! prints one human-readable result per command.
//!
//! ## Flow
//! ```text
//!   stdin line ──► parser::tokenize ──► ConsoleCommand::parse
//!                                             │
//!                                             ▼
//!                          Dispatcher::execute ──► KvStore call
//!                                             │
//!                                             ▼
//!                                    result line on stdout
//! ```

mod parser;
mod command;
mod dispatcher;
mod repl;

pub use parser::{tokenize, join_value};
pub use command::ConsoleCommand;
pub use dispatcher::{Dispatcher, Flow};
pub use repl::Repl;

/// Printed once the session is up
pub const GREETING: &str = "Interactive Console (Type 'help' for commands)";

/// Printed when the loop ends
pub const FAREWELL: &str = "Exiting...";

pub const PROMPT: &str = "> ";

/// Printed for an empty line
pub const INVALID_COMMAND: &str = "Invalid command. Type 'help' for a list of commands.";

/// Output of `help`
pub const HELP_TEXT: &str = "
Commands:
  help                Show this help message
  set <key> <value>   Set a key-value pair in the store
  get <key>           Get the value of a key from the store
  delete <key>        Delete a key from the store
  list                List all keys stored in the store
  exit                Exit the console
";
