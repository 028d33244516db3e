//! Speech Routes
//!
//! 定义语音识别与合成的 API 路由。

use crate::api::handlers::speech_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建语音路由器
pub fn create_speech_router() -> Router<AppState> {
    Router::new()
        .route("/stt", post(speech_to_text))
        .route("/tts", post(text_to_speech))
        .route("/tts/base64", post(text_to_speech_base64))
}
