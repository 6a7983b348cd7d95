//! Command Dispatcher
//!
//! Routes parsed commands to the store and renders the outcome.
//!
//! Each store-backed command makes exactly one store call. Usage errors
//! never reach the store. Every outcome, including failures, is written
//! to the output; nothing is swallowed.

use std::io::Write;

use crate::client::KvStore;
use crate::error::Result;
use super::{ConsoleCommand, HELP_TEXT};

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Executes console commands against a store
pub struct Dispatcher<S> {
    store: S,
}

impl<S: KvStore> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parse and execute one input line
    ///
    /// Usage errors are printed and the loop continues. The only error
    /// returned is a failure to write to `out`.
    pub fn dispatch_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match ConsoleCommand::from_line(line) {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                writeln!(out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command
    pub fn execute<W: Write>(&mut self, command: ConsoleCommand, out: &mut W) -> Result<Flow> {
        match command {
            ConsoleCommand::Help => write!(out, "{}", HELP_TEXT)?,
            ConsoleCommand::Set { key, value } => self.set(&key, &value, out)?,
            ConsoleCommand::Get { key } => self.get(&key, out)?,
            ConsoleCommand::Delete { key } => self.delete(&key, out)?,
            ConsoleCommand::List => self.list(out)?,
            ConsoleCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    fn set<W: Write>(&mut self, key: &str, value: &str, out: &mut W) -> Result<()> {
        match self.store.put(key, value) {
            Ok(()) => writeln!(out, "Key '{}' set to '{}'", key, value)?,
            Err(e) => writeln!(out, "Failed to set key '{}': {}", key, e)?,
        }
        Ok(())
    }

    fn get<W: Write>(&mut self, key: &str, out: &mut W) -> Result<()> {
        match self.store.get(key) {
            Ok(Some(value)) => writeln!(out, "Key '{}' = '{}'", key, value)?,
            Ok(None) => writeln!(out, "Key '{}' not found", key)?,
            Err(e) => writeln!(out, "Failed to get key '{}': {}", key, e)?,
        }
        Ok(())
    }

    fn delete<W: Write>(&mut self, key: &str, out: &mut W) -> Result<()> {
        match self.store.delete(key) {
            Ok(()) => writeln!(out, "Key '{}' deleted", key)?,
            Err(e) => writeln!(out, "Failed to delete key '{}': {}", key, e)?,
        }
        Ok(())
    }

    fn list<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let entries = match self.store.scan_prefix("") {
            Ok(entries) => entries,
            Err(e) => {
                writeln!(out, "Failed to list keys: {}", e)?;
                return Ok(());
            }
        };

        if entries.is_empty() {
            writeln!(out, "No keys found.")?;
            return Ok(());
        }

        writeln!(out, "Stored Keys:")?;
        for entry in entries {
            writeln!(out, "{} = {}", entry.key, entry.value)?;
        }
        Ok(())
    }
}
