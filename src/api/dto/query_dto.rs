//! 查询 DTO
//!
//! 定义问答相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::emotion::Emotion;

/// 单问请求
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// 学生的问题
    pub question: String,
}

/// 单问响应
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// 回答文本
    pub text: String,
    /// 情绪标签
    pub emotion: Emotion,
    /// 来源标识
    pub sources: Vec<String>,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// 会话请求
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// 学生的问题
    pub question: String,
    /// 会话 ID，缺省时由服务端铸造
    pub session_id: Option<String>,
}

/// 会话响应
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// 回答文本
    pub text: String,
    /// 情绪标签
    pub emotion: Emotion,
    /// 来源标识
    pub sources: Vec<String>,
    /// 会话 ID
    pub session_id: String,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}
