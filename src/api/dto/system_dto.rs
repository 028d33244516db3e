//! 系统 DTO

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 服务横幅响应
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    /// 欢迎消息
    pub message: String,
    /// 版本号
    pub version: String,
    /// 可用路由
    pub routes: Vec<String>,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
    /// 当前会话数量
    pub active_sessions: usize,
}
