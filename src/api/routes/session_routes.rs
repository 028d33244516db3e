//! Session Routes
//!
//! 定义会话相关的 API 路由。

use crate::api::handlers::session_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建会话路由器
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/reset", post(reset_session))
        .route("/sessions", get(list_sessions))
        .route("/session/:id", get(get_session))
}
