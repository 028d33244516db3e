//! 会话模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::emotion::Emotion;

/// 会话历史保留的最大条目数，超出时淘汰最旧的记录
pub const MAX_HISTORY: usize = 20;

/// 一次问答交换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// 学生的问题
    pub question: String,
    /// 导师的回答
    pub answer: String,
    /// 回答的情绪标签
    pub emotion: Emotion,
    /// 交换发生时间
    pub timestamp: DateTime<Utc>,
}

/// 会话实体
///
/// 仅存在于进程内存中，重启即丢失。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// 会话唯一标识
    pub id: String,
    /// 会话创建时间
    pub created_at: DateTime<Utc>,
    /// 累计消息数
    pub message_count: u64,
    /// 最近的问答历史（最多 MAX_HISTORY 条，末尾最新）
    pub history: Vec<Exchange>,
}

impl Session {
    /// 创建新会话
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// 以给定 ID 创建会话
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            message_count: 0,
            history: Vec::new(),
        }
    }

    /// 追加一次交换并截断历史
    pub fn push_exchange(&mut self, question: &str, answer: &str, emotion: Emotion) {
        self.history.push(Exchange {
            question: question.to_string(),
            answer: answer.to_string(),
            emotion,
            timestamp: Utc::now(),
        });
        self.message_count += 1;

        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// 清空历史和计数，保留会话记录本身
    pub fn clear(&mut self) {
        self.history.clear();
        self.message_count = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new_has_unique_id() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.message_count, 0);
        assert!(a.history.is_empty());
    }

    #[test]
    fn test_history_capped_at_max() {
        let mut session = Session::new();
        for i in 0..(MAX_HISTORY + 7) {
            session.push_exchange(&format!("q{}", i), &format!("a{}", i), Emotion::Neutral);
        }
        assert_eq!(session.history.len(), MAX_HISTORY);
        assert_eq!(session.message_count, (MAX_HISTORY + 7) as u64);
        // 保留的应当是最近的条目，最新在末尾
        assert_eq!(session.history.last().unwrap().question, "q26");
        assert_eq!(session.history.first().unwrap().question, "q7");
    }

    #[test]
    fn test_clear_keeps_identity() {
        let mut session = Session::new();
        let id = session.id.clone();
        session.push_exchange("q", "a", Emotion::Happy);
        session.clear();
        assert_eq!(session.id, id);
        assert_eq!(session.message_count, 0);
        assert!(session.history.is_empty());
    }
}
