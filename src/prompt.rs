//! Prompt capability
//!
//! Confirmation and notification dialogs, injected into the Settings and
//! Capture workflows so they never talk to a terminal or browser directly.

use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Ask the user to confirm an action, or tell them something
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question; `true` means proceed
    fn confirm(&self, message: &str) -> bool;

    /// Show a message
    fn notify(&self, message: &str);
}

/// Interactive prompter on stdin/stdout
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", message);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si"),
            Err(_) => false,
        }
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Records notices and answers confirmations with a fixed value.
///
/// Used by the view server to return notices in responses.
#[derive(Debug)]
pub struct CollectingPrompter {
    answer: bool,
    notices: Mutex<Vec<String>>,
}

impl CollectingPrompter {
    /// Prompter whose confirmations all answer `answer`
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Notices recorded so far
    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Prompter for CollectingPrompter {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message = %message, answer = self.answer, "Confirmation answered");
        self.answer
    }

    fn notify(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}
