//! 语音 DTO
//!
//! 定义语音识别与合成的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON 形式的语音识别请求（multipart 之外的第二种形态）
#[derive(Debug, Deserialize)]
pub struct SttJsonRequest {
    /// Base64 编码的音频
    pub audio_base64: String,
    /// 音频格式，缺省为 webm
    pub format: Option<String>,
    /// 关联的会话 ID
    pub session_id: Option<String>,
}

/// 语音识别响应
#[derive(Debug, Serialize)]
pub struct SttResponse {
    /// 转写文本
    pub text: String,
    /// 实际产出结果的提供方
    pub provider: String,
    /// 是否为降级输出
    pub degraded: bool,
    /// 关联的会话 ID
    pub session_id: Option<String>,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// 语音合成请求
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    /// 要合成的文本
    pub text: String,
    /// 情绪标签，缺省为 neutral
    pub emotion: Option<String>,
    /// 指定音色
    pub voice: Option<String>,
    /// 语速
    pub speed: Option<f32>,
}

/// Base64 形式的语音合成响应
#[derive(Debug, Serialize)]
pub struct TtsBase64Response {
    /// Base64 编码的音频
    pub audio_base64: String,
    /// 音频格式
    pub format: String,
    /// 实际产出结果的提供方
    pub provider: String,
    /// 是否为降级输出
    pub degraded: bool,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}
