// HTTP request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::SupportServer;
use crate::data::Resource;
use crate::providers::ChatMessage;

/// Create the application router
pub fn create_router(server: Arc<SupportServer>) -> Router {
    Router::new()
        .route("/v1/chat", post(handle_chat))
        .route("/v1/session/:id", get(get_session).delete(delete_session))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Request body for POST /v1/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session ID for conversation continuity
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    /// Reply including the suggested resource block
    pub reply: String,
    pub resource: Option<Resource>,
    pub crisis: bool,
    pub symptoms: Vec<String>,
}

/// Handle POST /v1/chat
async fn handle_chat(
    State(server): State<Arc<SupportServer>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }

    let session = server
        .session_manager()
        .get_or_create(request.session_id.as_deref())?;

    // Turns on one session run one at a time
    let mut state = session.lock().await;
    state.touch();
    let session_id = state.id.clone();

    // The user message stays in history even when the model call fails
    let turn = server
        .assistant()
        .respond(&mut state.conversation, message)
        .await?;
    drop(state);

    if !server.session_manager().contains(&session_id) {
        tracing::warn!(
            session_id = %session_id,
            "Session ended while the reply was composed; returning the reply anyway"
        );
    }

    Ok(Json(ChatResponse {
        session_id,
        reply: turn.rendered,
        resource: turn.resource,
        crisis: turn.crisis,
        symptoms: turn.report.symptoms,
    }))
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: String,
    pub last_activity: String,
    pub messages: Vec<ChatMessage>,
}

/// Handle GET /v1/session/:id
async fn get_session(
    State(server): State<Arc<SupportServer>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, AppError> {
    let session = server
        .session_manager()
        .get(&session_id)
        .ok_or_else(|| AppError::not_found(format!("Session not found: {}", session_id)))?;
    let state = session.lock().await;

    Ok(Json(SessionInfo {
        id: state.id.clone(),
        created_at: state.created_at.to_rfc3339(),
        last_activity: state.last_activity.to_rfc3339(),
        messages: state.conversation.messages().to_vec(),
    }))
}

/// Handle DELETE /v1/session/:id
async fn delete_session(
    State(server): State<Arc<SupportServer>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if server.session_manager().delete(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Session not found: {}", session_id)))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub active_sessions: usize,
    pub resources_loaded: usize,
}

/// Handle GET /health
pub async fn health_check(State(server): State<Arc<SupportServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        active_sessions: server.session_manager().active_count(),
        resources_loaded: server.assistant().data().resources.len(),
    })
}

/// Error response carrying an HTTP status
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(message.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: anyhow::anyhow!(message.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(status = %self.status, error = %format!("{:#}", self.error), "Request failed");

        let error_type = if self.status.is_server_error() {
            "api_error"
        } else {
            "invalid_request"
        };
        let body = serde_json::json!({
            "error": {
                "message": format!("{:#}", self.error),
                "type": error_type
            }
        });

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}
