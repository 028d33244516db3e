use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use crate::api::{
    app_state::AppState,
    dto::system_dto::{BannerResponse, HealthResponse},
};

/// 服务横幅和路由清单
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.record_http_request();

    Json(BannerResponse {
        message: format!("Welcome to the {} Conversational AI Tutor API!", state.config.app_name),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routes: vec![
            "GET /".to_string(),
            "GET /health".to_string(),
            "POST /query".to_string(),
            "POST /chat".to_string(),
            "POST /stt".to_string(),
            "POST /tts".to_string(),
            "POST /tts/base64".to_string(),
            "POST /reset".to_string(),
            "GET /sessions".to_string(),
            "GET /session/{id}".to_string(),
        ],
    })
}

/// 健康检查
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.record_http_request();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        active_sessions: state.sessions.active_count(),
    })
}
