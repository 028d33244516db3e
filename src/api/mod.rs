//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::app_state::AppState;

/// 按配置构造 CORS 层
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::system_routes::create_system_router())
        .merge(routes::query_routes::create_query_router())
        .merge(routes::session_routes::create_session_router())
        .merge(routes::speech_routes::create_speech_router());

    let cors = cors_layer(&app_state);

    api.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
