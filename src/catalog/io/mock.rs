//! # Mock I/O Implementations for Testing
//!
//! Scripted stand-ins for the terminal: queued confirmation answers and a
//! fixed list of command lines.

use super::{CommandSource, Prompt};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Prompt that answers from a queue and records every question
pub struct MockPrompt {
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    asked: Mutex<Vec<String>>,
}

impl MockPrompt {
    /// Prompt that always answers `answer`
    pub fn always(answer: bool) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            default_answer: answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompt that answers from `answers` in order, then declines
    pub fn with_answers(answers: Vec<bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            default_answer: false,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every confirmation message shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|asked| asked.clone()).unwrap_or_default()
    }
}

impl Prompt for MockPrompt {
    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.default_answer)
    }
}

/// Command source replaying a fixed script
pub struct ScriptedCommandSource {
    lines: VecDeque<String>,
}

impl ScriptedCommandSource {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }
}

#[async_trait]
impl CommandSource for ScriptedCommandSource {
    /// Yield once before each line, so results that are already on their way
    /// land first, as they would for someone typing at human speed
    async fn next_line(&mut self) -> Result<Option<String>> {
        tokio::task::yield_now().await;
        Ok(self.lines.pop_front())
    }
}
