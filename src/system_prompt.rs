//! System instruction construction
//!
//! The instruction is never stored: it is rendered from the configured
//! subject and the session's current level on every request, so a level
//! change only affects requests made after it.

use crate::tutor::Level;

/// Subject the mentor is restricted to when nothing else is configured
pub const DEFAULT_SUBJECT: &str = "Data Science";

/// Template for the level-dependent instruction prepended to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTemplate {
    subject: String,
}

impl InstructionTemplate {
    pub fn new(subject: impl Into<String>) -> Self {
        let subject = subject.into();
        let subject = subject.trim();
        Self {
            subject: if subject.is_empty() {
                DEFAULT_SUBJECT.to_string()
            } else {
                subject.to_string()
            },
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Render the instruction for `level`
    pub fn render(&self, level: Level) -> String {
        let subject = &self.subject;
        format!(
            "You are an AI {subject} tutor. Answer only {subject}-related queries. \
             Provide responses based on the user's level: {}.",
            level.label()
        )
    }
}

impl Default for InstructionTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT)
    }
}
