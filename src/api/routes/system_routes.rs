//! System Routes
//!
//! 定义横幅和健康检查的 API 路由。

use crate::api::handlers::system_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建系统路由器
pub fn create_system_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
