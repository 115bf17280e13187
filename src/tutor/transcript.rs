//! Append-only transcript of a session

use crate::llm::{LlmMessage, MessageRole};
use serde::Serialize;

/// One message of the transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: MessageRole,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn to_message(&self) -> LlmMessage {
        LlmMessage {
            role: self.role,
            text: self.text.clone(),
        }
    }
}

/// Ordered turns of one session, oldest first
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn at the end. No deduplication and no size bound.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// All turns, oldest first
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order_and_duplicates() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("hi"));
        store.append(Turn::assistant("hello"));
        store.append(Turn::user("hi"));

        let roles: Vec<_> = store.all().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(store.all()[0], store.all()[2]);
    }

    #[test]
    fn reading_does_not_consume() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("q"));
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn clear_empties() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("q"));
        store.append(Turn::assistant("a"));
        store.clear();
        assert!(store.all().is_empty());
        store.clear();
        assert!(store.all().is_empty());
    }

    #[test]
    fn turn_serializes_role_and_text() {
        let json = serde_json::to_value(Turn::assistant("A p-value is...")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "text": "A p-value is..."}));
    }
}
