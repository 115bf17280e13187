//! Per-session request state machine
//!
//! Pure transitions in the Elm style: a state and an event go in, the next
//! state and the effects to perform come out. The session applies
//! transcript effects itself; the runtime performs the model call.

mod transition;

pub use transition::{transition, TransitionError};

use crate::tutor::Level;

/// Request state of a session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Awaiting input
    #[default]
    Idle,
    /// A model request is in flight for `pending`
    Requesting { pending: String },
}

impl ConvState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ConvState::Requesting { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::Requesting { .. } => "requesting",
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Non-empty utterance submitted by the user
    UserMessage { text: String },
    /// The model answered the pending utterance
    LlmReply { text: String },
    /// The model call failed
    LlmFailed { message: String },
    /// Reset signal from the page
    Reset,
    /// The user picked another level
    SelectLevel { level: Level },
}

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the model for `utterance`
    RequestLlm { utterance: String },
    /// Append the utterance, then the reply, to the transcript
    FoldReply { utterance: String, reply: String },
    /// Empty the transcript
    ClearTranscript,
    /// Change the level used for later requests
    SetLevel { level: Level },
}
