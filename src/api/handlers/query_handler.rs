use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::query_dto::{ChatRequest, ChatResponse, QueryRequest, QueryResponse},
    },
    error::AppError,
    services::query::QueryMode,
};

/// Handle a single stateless query.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question must not be empty".to_string()));
    }

    debug!(question_len = question.len(), "handling stateless query");
    state.metrics.record_query();

    let result = state
        .query_processor
        .process(question, QueryMode::Stateless)
        .await;

    Ok(Json(QueryResponse {
        text: result.text,
        emotion: result.emotion,
        sources: result.sources,
        timestamp: result.timestamp,
    }))
}

/// Handle a conversational query, maintaining per-session history.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::Validation("question must not be empty".to_string()));
    }

    state.metrics.record_chat();

    let session_id = state.sessions.get_or_create(request.session_id.as_deref());
    debug!(%session_id, "handling conversational query");

    // 会话历史按调用注入，没有跨会话共享的记忆对象
    let history = state
        .sessions
        .history(&session_id)
        .map(|session| session.history)
        .unwrap_or_default();

    let result = state
        .query_processor
        .process(&question, QueryMode::Conversational(&history))
        .await;

    state
        .sessions
        .append_exchange(&session_id, &question, &result.text, result.emotion)?;

    Ok(Json(ChatResponse {
        text: result.text,
        emotion: result.emotion,
        sources: result.sources,
        session_id,
        timestamp: result.timestamp,
    }))
}
