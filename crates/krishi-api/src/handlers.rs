//! Route handler functions for all API endpoints.
//!
//! Each handler extracts parameters via axum extractors, talks to the chat
//! orchestrator or model registry, and returns JSON responses.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use krishi_chat::{ChatSessionSummary, ChatTurn, Intent};
use krishi_core::types::Season;
use krishi_model::ModelStatus;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's utterance for this turn.
    pub message: String,
    /// Session to continue; omitted for a new conversation.
    pub session_id: Option<Uuid>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub session_id: Uuid,
    pub reply: String,
    pub intent: Intent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub chat_enabled: bool,
    pub groundwater_model: bool,
    pub crop_model: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ChatSessionSummary>,
}

/// Remembered slots, exposed so a UI can show what the bot retained.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryBody {
    pub district: Option<String>,
    pub month: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub started_at: i64,
    pub last_message_at: i64,
    pub message_count: u64,
    pub memory: MemoryBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub turns: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyResponse {
    pub kind: String,
    pub labels: Vec<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health - service status and loaded-model flags.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.models.status();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        chat_enabled: state.config.chat.enabled,
        groundwater_model: status.groundwater_model,
        crop_model: status.crop_model,
    })
}

/// POST /chat - handle one utterance and return the reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let (reply, session_id) = state
        .orchestrator
        .handle_message(&req.message, req.session_id)?;
    tracing::debug!(session_id = %session_id, intent = reply.intent.as_str(), "Chat turn handled");
    Ok(Json(ChatResponseBody {
        session_id,
        reply: reply.text,
        intent: reply.intent,
    }))
}

/// GET /chat/sessions - list active session summaries.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.orchestrator.list_sessions(),
    })
}

/// GET /chat/sessions/{id} - one session with its remembered slots.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .orchestrator
        .get_session(id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))?;
    Ok(Json(SessionResponse {
        id: session.id,
        started_at: session.started_at,
        last_message_at: session.last_message_at,
        message_count: session.message_count,
        memory: MemoryBody {
            district: session.memory.district,
            month: session.memory.month,
            season: session.memory.season,
            year: session.memory.year,
        },
    }))
}

/// GET /chat/sessions/{id}/history - the session transcript, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let turns = state.orchestrator.get_history(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        turns,
    }))
}

/// DELETE /chat/sessions/{id} - drop a session and its transcript.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(Json(DeleteResponse { deleted: true }))
}

/// GET /models - which prediction collaborators loaded, with vocab sizes.
pub async fn models(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.models.status())
}

/// GET /vocabulary/{kind} - the fixed label list for one codec.
pub async fn vocabulary(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<VocabularyResponse>, ApiError> {
    let labels = match kind.as_str() {
        "districts" => state.models.districts.labels(),
        "months" => state.models.months.labels(),
        "seasons" => state.models.seasons.labels(),
        "crops" => state.models.crops.labels(),
        _ => {
            return Err(ApiError::NotFound(format!(
                "unknown vocabulary kind: {}",
                kind
            )))
        }
    };
    Ok(Json(VocabularyResponse {
        kind,
        labels: labels.to_vec(),
    }))
}
