//! # Terminal I/O
//!
//! Stdin-backed implementations. Both read through the process-wide stdin
//! buffer, so a confirmation answer is never swallowed by the command reader.
//! Command lines are read on the blocking pool one at a time, and only while
//! the shell is waiting for one, so a confirmation never races the reader.

use super::{CommandSource, Prompt};
use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use tokio::task::JoinHandle;

/// Confirmation prompt on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{message} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) => {
                tracing::debug!("End of input while confirming, treating as no");
                false
            }
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Command lines from stdin
#[derive(Debug)]
pub struct StdinCommandSource {
    interactive: bool,
    pending: Option<JoinHandle<io::Result<Option<String>>>>,
}

impl StdinCommandSource {
    pub fn new() -> Self {
        Self {
            interactive: atty::is(atty::Stream::Stdin),
            pending: None,
        }
    }
}

fn read_stdin_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

impl Default for StdinCommandSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSource for StdinCommandSource {
    /// Resume the read left pending by a dropped call, or start a new one
    async fn next_line(&mut self) -> Result<Option<String>> {
        let read = self
            .pending
            .get_or_insert_with(|| tokio::task::spawn_blocking(read_stdin_line));
        let outcome = read.await;
        self.pending = None;
        Ok(outcome??)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
