//! Pure state transition function

use super::{ConvState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("The mentor is still answering the previous question")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Level changes are accepted in any state; an in-flight request
        // already carries the instruction it was built with.
        (_, Event::SelectLevel { level }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::SetLevel { level }))
        }

        (ConvState::Idle, Event::UserMessage { text }) => {
            Ok(TransitionResult::new(ConvState::Requesting {
                pending: text.clone(),
            })
            .with_effect(Effect::RequestLlm { utterance: text }))
        }

        (ConvState::Idle, Event::Reset) => {
            Ok(TransitionResult::new(ConvState::Idle).with_effect(Effect::ClearTranscript))
        }

        (ConvState::Requesting { .. }, Event::UserMessage { .. } | Event::Reset) => {
            Err(TransitionError::Busy)
        }

        (ConvState::Requesting { pending }, Event::LlmReply { text }) => {
            Ok(TransitionResult::new(ConvState::Idle).with_effect(Effect::FoldReply {
                utterance: pending.clone(),
                reply: text,
            }))
        }

        // Failure leaves the transcript untouched
        (ConvState::Requesting { .. }, Event::LlmFailed { .. }) => {
            Ok(TransitionResult::new(ConvState::Idle))
        }

        (ConvState::Idle, event @ (Event::LlmReply { .. } | Event::LlmFailed { .. })) => Err(
            TransitionError::InvalidTransition(format!("{event:?} while idle")),
        ),
    }
}
