use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::session_dto::{
            ExchangeResponse, ResetRequest, ResetResponse, SessionRecordResponse,
            SessionSummaryResponse,
        },
    },
    error::AppError,
};

/// List all sessions with their summary data.
pub async fn list_sessions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.metrics.record_http_request();

    let summaries: Vec<SessionSummaryResponse> = state
        .sessions
        .list()
        .into_iter()
        .map(|summary| SessionSummaryResponse {
            id: summary.id,
            created: summary.created,
            message_count: summary.message_count,
        })
        .collect();

    Ok(Json(summaries))
}

/// Fetch the full record of one session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.metrics.record_http_request();
    debug!(%id, "fetching session record");

    let session = state
        .sessions
        .history(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    Ok(Json(SessionRecordResponse {
        id: session.id,
        created: session.created_at,
        message_count: session.message_count,
        history: session
            .history
            .into_iter()
            .map(|exchange| ExchangeResponse {
                question: exchange.question,
                answer: exchange.answer,
                emotion: exchange.emotion,
                timestamp: exchange.timestamp,
            })
            .collect(),
    }))
}

/// Reset a session's history without deleting the record.
///
/// A request without a session id is acknowledged as a no-op so that
/// clients can reset unconditionally.
pub async fn reset_session(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.metrics.record_http_request();

    match request.session_id {
        Some(id) if !id.is_empty() => {
            state.sessions.reset(&id)?;
            debug!(%id, "session reset");
            Ok(Json(ResetResponse {
                message: "Conversation history cleared".to_string(),
                session_id: Some(id),
                timestamp: Utc::now(),
            }))
        }
        _ => Ok(Json(ResetResponse {
            message: "No session specified, nothing to reset".to_string(),
            session_id: None,
            timestamp: Utc::now(),
        })),
    }
}
