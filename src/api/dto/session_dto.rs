//! 会话 DTO
//!
//! 定义会话相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::emotion::Emotion;

/// 会话摘要响应
#[derive(Debug, Serialize)]
pub struct SessionSummaryResponse {
    /// 会话 ID
    pub id: String,
    /// 创建时间
    pub created: DateTime<Utc>,
    /// 累计消息数
    pub message_count: u64,
}

/// 一次交换的响应表示
#[derive(Debug, Serialize)]
pub struct ExchangeResponse {
    /// 学生的问题
    pub question: String,
    /// 导师的回答
    pub answer: String,
    /// 情绪标签
    pub emotion: Emotion,
    /// 交换时间
    pub timestamp: DateTime<Utc>,
}

/// 完整会话记录响应
#[derive(Debug, Serialize)]
pub struct SessionRecordResponse {
    /// 会话 ID
    pub id: String,
    /// 创建时间
    pub created: DateTime<Utc>,
    /// 累计消息数
    pub message_count: u64,
    /// 问答历史
    pub history: Vec<ExchangeResponse>,
}

/// 重置请求
#[derive(Debug, Deserialize, Default)]
pub struct ResetRequest {
    /// 要重置的会话 ID
    pub session_id: Option<String>,
}

/// 重置响应
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// 确认消息
    pub message: String,
    /// 被重置的会话 ID
    pub session_id: Option<String>,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}
