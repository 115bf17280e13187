//! Prompt assembly
//!
//! The outbound sequence for one request is
//! `[instruction] ++ transcript ++ [utterance]`: the instruction travels as
//! the system content, the stored turns and the new utterance as messages.

use super::{ConversationStore, Level, Turn};
use crate::llm::{LlmMessage, LlmRequest, MessageRole, SystemContent};
use crate::system_prompt::InstructionTemplate;

/// Builds model requests from a session's level and transcript
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    template: InstructionTemplate,
    temperature: Option<f32>,
    history_limit: Option<usize>,
}

impl PromptAssembler {
    pub fn new(template: InstructionTemplate) -> Self {
        Self {
            template,
            temperature: None,
            history_limit: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Send at most `limit` of the most recent stored turns per request.
    /// The store itself is never truncated.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn template(&self) -> &InstructionTemplate {
        &self.template
    }

    pub fn instruction(&self, level: Level) -> String {
        self.template.render(level)
    }

    /// Build the request for `utterance` on top of `transcript`
    pub fn assemble(&self, level: Level, transcript: &[Turn], utterance: &str) -> LlmRequest {
        let history = self.history_window(transcript);

        let mut messages: Vec<LlmMessage> = Vec::with_capacity(history.len() + 1);
        messages.extend(history.iter().map(Turn::to_message));
        messages.push(LlmMessage::user(utterance));

        LlmRequest {
            system: vec![SystemContent::new(self.instruction(level))],
            messages,
            temperature: self.temperature,
            max_tokens: None,
        }
    }

    /// Record a completed exchange: the utterance first, then the reply
    pub fn fold_reply(store: &mut ConversationStore, utterance: &str, reply: &str) {
        store.append(Turn::user(utterance));
        store.append(Turn::assistant(reply));
    }

    fn history_window<'a>(&self, transcript: &'a [Turn]) -> &'a [Turn] {
        let Some(limit) = self.history_limit else {
            return transcript;
        };
        let window = &transcript[transcript.len().saturating_sub(limit)..];
        // The model expects the history to open with a user turn
        match window.split_first() {
            Some((first, rest)) if first.role() == MessageRole::Assistant => rest,
            _ => window,
        }
    }
}
