//! # I/O Abstraction Layer
//!
//! Trait seams for everything interactive, so controllers and the shell can
//! be driven from tests without a terminal.
//!
//! ```text
//! Production:  AppController ──▶ StdinCommandSource ──▶ blocking reader task ──▶ stdin
//!              controllers   ──▶ TerminalPrompt     ──▶ stdin / stderr
//!
//! Testing:     AppController ──▶ ScriptedCommandSource ──▶ VecDeque<String>
//!              controllers   ──▶ MockPrompt            ──▶ queued answers
//! ```

use anyhow::Result;
use async_trait::async_trait;

pub mod mock;
pub mod terminal;

pub use mock::{MockPrompt, ScriptedCommandSource};
pub use terminal::{StdinCommandSource, TerminalPrompt};

/// Interactive yes/no confirmation
pub trait Prompt: Send + Sync {
    /// Ask the user to confirm; `true` means go ahead
    fn confirm(&self, message: &str) -> bool;
}

/// Source of shell command lines
///
/// The shell waits on [`CommandSource::next_line`] and on in-flight requests
/// at the same time, dropping the read future whenever a result wins.
/// Implementations must not lose a line when that happens.
#[async_trait]
pub trait CommandSource: Send {
    /// Read the next command line, `None` at end of input
    async fn next_line(&mut self) -> Result<Option<String>>;

    /// Whether a human is typing (controls the shell prompt)
    fn is_interactive(&self) -> bool {
        false
    }
}
