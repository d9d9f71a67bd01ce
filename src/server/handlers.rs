// HTTP request handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::CompanionServer;
use crate::chat::{ChatError, ChatOutcome};
use crate::store::ChatTurn;

/// Header identifying the authenticated subject. Session/token validation
/// happens upstream; this layer only requires the identity to be present.
pub const SUBJECT_HEADER: &str = "x-subject-id";

/// Create the main application router
pub fn create_router(server: Arc<CompanionServer>) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/history", get(get_history))
        .route("/api/session-status", get(get_session_status))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Request body for /api/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Raw user message text
    pub message: String,
}

/// Response body for /api/chat
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_crisis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub still_in_crisis_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        // Flags are emitted only when set, matching the endpoint contract.
        let flag = |b: bool| if b { Some(true) } else { None };
        Self {
            reply: outcome.reply,
            is_crisis: flag(outcome.is_crisis),
            crisis_resolved: flag(outcome.crisis_resolved),
            still_in_crisis_mode: flag(outcome.still_in_crisis_mode),
            framework: outcome.framework.map(|f| f.as_str().to_string()),
        }
    }
}

/// Handle POST /api/chat - Main chat endpoint
async fn handle_chat(
    State(server): State<Arc<CompanionServer>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let subject_id = require_subject(&headers)?;

    let outcome = server
        .engine()
        .handle_message(&subject_id, &request.message)
        .await?;

    Ok(Json(outcome.into()))
}

/// Response body for /api/history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<ChatTurn>,
}

/// Handle GET /api/history - Chat turns for the subject, oldest first
async fn get_history(
    State(server): State<Arc<CompanionServer>>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, AppError> {
    let subject_id = require_subject(&headers)?;

    let turns = server
        .history()
        .list(&subject_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(HistoryResponse { turns }))
}

/// Session status for debugging
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub subject_id: String,
    pub awaiting_safety_confirmation: bool,
    pub active_sessions: usize,
}

/// Handle GET /api/session-status - Safety-state flags for the subject
async fn get_session_status(
    State(server): State<Arc<CompanionServer>>,
    headers: HeaderMap,
) -> Result<Json<SessionStatus>, AppError> {
    let subject_id = require_subject(&headers)?;
    let sessions = server.engine().sessions();

    Ok(Json(SessionStatus {
        awaiting_safety_confirmation: sessions.safety_state(&subject_id).is_awaiting(),
        active_sessions: sessions.active_count(),
        subject_id,
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub active_sessions: usize,
}

/// Handle GET /health - Health check endpoint
pub async fn health_check(
    State(server): State<Arc<CompanionServer>>,
) -> Result<Json<HealthStatus>, AppError> {
    Ok(Json(HealthStatus {
        status: "healthy".to_string(),
        active_sessions: server.engine().sessions().active_count(),
    }))
}

fn require_subject(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or(AppError::Unauthenticated)
}

/// Application errors mapped to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthenticated,
    NotFound(String),
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong { .. } => {
                AppError::BadRequest(err.to_string())
            }
            ChatError::ProfileNotFound => AppError::NotFound(err.to_string()),
            ChatError::Internal(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(message) => {
                // Log the real error; the caller gets a generic apology.
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "I apologize, but I encountered an issue processing your message. \
                     Please try again."
                        .to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
