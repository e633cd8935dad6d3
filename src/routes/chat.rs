// src/routes/chat.rs
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HistoryResponse, ResetRequest, ResetResponse},
    services::session_manager::MessageRole,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    // Opportunistic cleanup; no background task.
    let purged = state.sessions.purge_expired().await;
    if purged > 0 {
        tracing::debug!(purged, "dropped expired sessions");
    }

    let session_id = match &payload.session_id {
        Some(s) if !s.trim().is_empty() => {
            state.sessions.ensure_session(s).await;
            s.clone()
        }
        _ => state.sessions.create_session().await,
    };

    let trimmed = payload.message.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    state
        .sessions
        .append_message(&session_id, MessageRole::User, trimmed)
        .await;

    // One call per message. Any failure becomes an inline apology so the
    // session itself stays usable.
    let reply = match state.flow.run(trimmed).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, session_id = %session_id, "flow invocation failed");
            format!("I apologize, but I encountered an error: {err}")
        }
    };

    state
        .sessions
        .append_message(&session_id, MessageRole::Assistant, &reply)
        .await;

    Ok(Json(ChatResponse { session_id, reply }))
}

pub async fn reset_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ResetRequest>,
) -> Json<ResetResponse> {
    let cleared = state.sessions.clear_transcript(&payload.session_id).await;
    Json(ResetResponse {
        session_id: payload.session_id,
        cleared,
    })
}

pub async fn history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let messages = state
        .sessions
        .get_history(&session_id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    Ok(Json(HistoryResponse {
        session_id,
        messages,
    }))
}
