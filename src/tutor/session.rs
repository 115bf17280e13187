//! One client's tutoring session

use super::{ConversationStore, Level, PromptAssembler, Turn};
use crate::state_machine::{transition, ConvState, Effect, Event, TransitionError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Transcript, selected level and request state of one client
#[derive(Debug)]
pub struct Session {
    id: String,
    level: Level,
    store: ConversationStore,
    state: ConvState,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

/// Serializable view of a session, used for re-rendering the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub level: Level,
    pub transcript: Vec<Turn>,
    pub state: &'static str,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, level: Level) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            level,
            store: ConversationStore::new(),
            state: ConvState::Idle,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn transcript(&self) -> &[Turn] {
        self.store.all()
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    /// Time of the last accepted event
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Run `event` through the state machine and apply the transcript and
    /// level effects. Effects that need I/O are handed back to the caller.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        self.last_active = Utc::now();

        let mut pending = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::FoldReply { utterance, reply } => {
                    PromptAssembler::fold_reply(&mut self.store, &utterance, &reply);
                }
                Effect::ClearTranscript => self.store.clear(),
                Effect::SetLevel { level } => self.level = level,
                Effect::RequestLlm { .. } => pending.push(effect),
            }
        }
        Ok(pending)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            level: self.level,
            transcript: self.store.all().to_vec(),
            state: self.state.name(),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}
