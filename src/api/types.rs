//! API request and response types

use crate::llm::ModelInfo;
use crate::tutor::{Level, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// Request to start a session
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub level: Option<String>,
}

/// Request to change the expertise level
#[derive(Debug, Deserialize)]
pub struct SelectLevelRequest {
    pub level: String,
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with a session view
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Model reply, absent when the input was suppressed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub suppressed: bool,
    pub session: SessionSnapshot,
}

/// Level entry for the sidebar
#[derive(Debug, Serialize)]
pub struct LevelInfo {
    pub id: Level,
    pub label: &'static str,
}

/// Tutor profile: subject and selectable levels
#[derive(Debug, Serialize)]
pub struct TutorResponse {
    pub subject: String,
    pub levels: Vec<LevelInfo>,
    pub default_level: Level,
}

/// Response for model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
