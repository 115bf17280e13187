//! Session runtime
//!
//! Owns every live tutoring session and runs one interaction at a time per
//! session: state transition, prompt assembly, model call, fold-back. The
//! session lock is never held across the model call, and the call itself runs
//! in a background task so a dropped caller cannot leave a session busy.

pub mod traits;

#[cfg(test)]
pub mod testing;

pub use traits::*;

use crate::llm::{LlmError, LlmResponse};
use crate::state_machine::{Effect, Event, TransitionError};
use crate::tutor::{Level, PromptAssembler, Session, SessionSnapshot};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Errors surfaced to the API layer
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Model request task failed: {0}")]
    TaskFailed(String),
}

/// Result of submitting an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// Blank input never reaches the model
    Suppressed(SessionSnapshot),
    Answered {
        reply: String,
        session: SessionSnapshot,
    },
}

/// Manager for all tutoring sessions
pub struct SessionManager {
    llm: Arc<dyn LlmClient>,
    assembler: PromptAssembler,
    default_level: Level,
    /// Idle sessions older than this are evicted by `evict_idle`
    idle_ttl: Option<Duration>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(llm: Arc<dyn LlmClient>, assembler: PromptAssembler) -> Self {
        Self {
            llm,
            assembler,
            default_level: Level::default(),
            idle_ttl: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.assembler
    }

    /// Start a new session with an empty transcript
    pub async fn create(&self, level: Option<Level>) -> SessionSnapshot {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), level.unwrap_or(self.default_level));
        let snapshot = session.snapshot();

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %id, level = %snapshot.level, "Session created");
        snapshot
    }

    async fn session(&self, id: &str) -> Result<Arc<Mutex<Session>>, RuntimeError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RuntimeError::SessionNotFound(id.to_string()))
    }

    pub async fn get(&self, id: &str) -> Result<SessionSnapshot, RuntimeError> {
        Ok(self.session(id).await?.lock().await.snapshot())
    }

    /// Drop a session and its transcript
    pub async fn remove(&self, id: &str) -> Result<(), RuntimeError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(RuntimeError::SessionNotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions with no accepted event for longer than the idle TTL.
    /// Sessions with a request in flight, or locked by a caller, are kept.
    /// Returns the number evicted.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            let Ok(session) = session.try_lock() else {
                return true;
            };
            let expired = !session.state().is_busy()
                && now
                    .signed_duration_since(session.last_active())
                    .to_std()
                    .is_ok_and(|idle| idle >= ttl);
            if expired {
                tracing::debug!(session_id = %session.id(), "Evicting idle session");
            }
            !expired
        });
        before - sessions.len()
    }

    pub async fn select_level(&self, id: &str, level: Level) -> Result<SessionSnapshot, RuntimeError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.handle(Event::SelectLevel { level })?;
        tracing::debug!(session_id = %id, level = %level, "Level selected");
        Ok(session.snapshot())
    }

    pub async fn reset(&self, id: &str) -> Result<SessionSnapshot, RuntimeError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.handle(Event::Reset)?;
        tracing::info!(session_id = %id, "Transcript cleared");
        Ok(session.snapshot())
    }

    /// Run one interaction. On failure the transcript is left as it was.
    pub async fn ask(&self, id: &str, text: &str) -> Result<AskOutcome, RuntimeError> {
        let session = self.session(id).await?;

        if text.trim().is_empty() {
            return Ok(AskOutcome::Suppressed(session.lock().await.snapshot()));
        }

        let request = {
            let mut guard = session.lock().await;
            let effects = guard.handle(Event::UserMessage {
                text: text.to_string(),
            })?;
            let utterance = effects
                .into_iter()
                .find_map(|effect| match effect {
                    Effect::RequestLlm { utterance } => Some(utterance),
                    _ => None,
                })
                .ok_or_else(|| {
                    TransitionError::InvalidTransition("message produced no request".to_string())
                })?;
            tracing::debug!(
                session_id = %id,
                level = %guard.level(),
                history = guard.transcript().len(),
                "Assembling request"
            );
            self.assembler
                .assemble(guard.level(), guard.transcript(), &utterance)
        };

        // The exchange finishes in the background even if this future is
        // dropped, so the session always leaves `requesting`.
        let llm = Arc::clone(&self.llm);
        let worker = Arc::clone(&session);
        let session_id = id.to_string();
        let task = tokio::spawn(async move {
            let result = llm.complete(&request).await;
            settle(&worker, &session_id, llm.model_id(), result).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session_id = %id, error = %e, "Model request task failed");
                let mut guard = session.lock().await;
                if guard.state().is_busy() {
                    guard.handle(Event::LlmFailed {
                        message: e.to_string(),
                    })?;
                }
                Err(RuntimeError::TaskFailed(e.to_string()))
            }
        }
    }
}

/// Fold the model outcome back into the session
async fn settle(
    session: &Mutex<Session>,
    id: &str,
    model: &str,
    result: Result<LlmResponse, LlmError>,
) -> Result<AskOutcome, RuntimeError> {
    let mut guard = session.lock().await;
    match result {
        Ok(response) => {
            guard.handle(Event::LlmReply {
                text: response.text.clone(),
            })?;
            tracing::info!(
                session_id = %id,
                model = %model,
                turns = guard.transcript().len(),
                "Exchange recorded"
            );
            Ok(AskOutcome::Answered {
                reply: response.text,
                session: guard.snapshot(),
            })
        }
        Err(e) => {
            guard.handle(Event::LlmFailed {
                message: e.message.clone(),
            })?;
            tracing::warn!(
                session_id = %id,
                model = %model,
                error = %e,
                "Model call failed, transcript unchanged"
            );
            Err(RuntimeError::Llm(e))
        }
    }
}

/// Periodically evict idle sessions until the task is aborted
pub fn spawn_idle_sweeper(manager: Arc<SessionManager>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = manager.evict_idle(Utc::now()).await;
            if evicted > 0 {
                let remaining = manager.session_count().await;
                tracing::info!(
                    evicted,
                    remaining,
                    "Idle sessions evicted"
                );
            }
        }
    })
}
