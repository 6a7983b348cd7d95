//! Interactive Loop
//!
//! Prompt, read a line, dispatch, repeat. Strictly sequential: a command
//! finishes (including its store round trip) before the next line is read.

use std::io::{BufRead, ErrorKind, Write};

use crate::client::KvStore;
use crate::error::Result;
use super::{Dispatcher, Flow, FAREWELL, PROMPT};

/// The read-dispatch-print loop
pub struct Repl<S> {
    dispatcher: Dispatcher<S>,
    prompt: String,
}

impl<S: KvStore> Repl<S> {
    pub fn new(store: S) -> Self {
        Self {
            dispatcher: Dispatcher::new(store),
            prompt: PROMPT.to_string(),
        }
    }

    /// Replace the default `> ` prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Run until `exit` or end of input
    ///
    /// Both ways out print the farewell line. Lines that are not valid
    /// UTF-8 are reported and skipped; any other I/O failure on `input`
    /// or `out` ends the loop with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        let mut line = String::new();

        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => {
                    tracing::debug!("End of input");
                    writeln!(out)?;
                    break;
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    writeln!(out, "Invalid input: {}", e)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if self.dispatcher.dispatch_line(&line, &mut out)? == Flow::Exit {
                break;
            }
        }

        writeln!(out, "{}", FAREWELL)?;
        out.flush()?;
        Ok(())
    }

    /// Take back the underlying store
    pub fn into_store(self) -> S {
        self.dispatcher.into_store()
    }
}
