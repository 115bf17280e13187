//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    ChatRequest, ChatResponse, CreateSessionRequest, ErrorResponse, LevelInfo, ModelsResponse,
    SelectLevelRequest, SessionResponse, SuccessResponse, TutorResponse,
};
use super::AppState;
use crate::llm::LlmErrorKind;
use crate::runtime::{AskOutcome, RuntimeError};
use crate::state_machine::TransitionError;
use crate::tutor::Level;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the SPA
        .route("/", get(serve_spa))
        .route("/assets/*path", get(serve_static))
        // Tutor profile and models
        .route("/api/tutor", get(get_tutor))
        .route("/api/models", get(list_models))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/level", post(select_level))
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// SPA Handler
// ============================================================

async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Tutor Profile
// ============================================================

async fn get_tutor(State(state): State<AppState>) -> Json<TutorResponse> {
    Json(TutorResponse {
        subject: state.sessions.assembler().template().subject().to_string(),
        levels: Level::ALL
            .into_iter()
            .map(|level| LevelInfo {
                id: level,
                label: level.label(),
            })
            .collect(),
        default_level: Level::default(),
    })
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.llm_registry.available_model_info(),
        default: state.llm_registry.default_model_id().to_string(),
    })
}

// ============================================================
// Sessions
// ============================================================

fn parse_level(raw: &str) -> Result<Level, AppError> {
    raw.parse::<Level>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let level = req.level.as_deref().map(parse_level).transpose()?;

    Ok(Json(SessionResponse {
        session: state.sessions.create(level).await,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(SessionResponse {
        session: state.sessions.get(&id).await?,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.remove(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn select_level(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectLevelRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let level = parse_level(&req.level)?;
    Ok(Json(SessionResponse {
        session: state.sessions.select_level(&id, level).await?,
    }))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = match state.sessions.ask(&id, &req.text).await? {
        AskOutcome::Suppressed(session) => ChatResponse {
            reply: None,
            suppressed: true,
            session,
        },
        AskOutcome::Answered { reply, session } => ChatResponse {
            reply: Some(reply),
            suppressed: false,
            session,
        },
    };
    Ok(Json(response))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(SessionResponse {
        session: state.sessions.reset(&id).await?,
    }))
}

async fn get_version() -> &'static str {
    concat!("ds-mentor ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Upstream(StatusCode, String),
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            RuntimeError::Transition(TransitionError::Busy) => AppError::Conflict(err.to_string()),
            RuntimeError::Transition(TransitionError::InvalidTransition(_)) => {
                AppError::Conflict(err.to_string())
            }
            RuntimeError::Llm(e) => {
                let status = match e.kind {
                    LlmErrorKind::Auth => StatusCode::SERVICE_UNAVAILABLE,
                    LlmErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
                    LlmErrorKind::Network
                    | LlmErrorKind::ServerError
                    | LlmErrorKind::InvalidRequest
                    | LlmErrorKind::MalformedResponse
                    | LlmErrorKind::Unknown => StatusCode::BAD_GATEWAY,
                };
                AppError::Upstream(status, e.message)
            }
            RuntimeError::TaskFailed(_) => {
                AppError::Upstream(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(status, msg) => (status, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
