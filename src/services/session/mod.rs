//! 会话存储
//!
//! 进程内存中的会话记录，不跨重启持久化，也没有过期策略
//! （会话随进程生命周期累积）。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::emotion::Emotion;
use crate::models::session::Session;

/// 会话摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// 会话 ID
    pub id: String,
    /// 创建时间
    pub created: DateTime<Utc>,
    /// 累计消息数
    pub message_count: u64,
}

/// 会话存储接口
///
/// 所有变更都经由 DashMap 的分片条目锁串行化，同一会话上的
/// 并发追加不会彼此覆盖。
pub trait SessionStore: Send + Sync {
    /// 取得或创建会话，返回会话 ID
    ///
    /// 传入 None 时铸造新 ID；传入未知 ID 时以该 ID 初始化空记录；
    /// 传入已知 ID 时原样返回，不触碰历史。
    fn get_or_create(&self, session_id: Option<&str>) -> String;

    /// 追加一次交换，历史截断到最近 20 条
    fn append_exchange(
        &self,
        session_id: &str,
        question: &str,
        answer: &str,
        emotion: Emotion,
    ) -> Result<()>;

    /// 清空指定会话的历史和计数，保留记录
    fn reset(&self, session_id: &str) -> Result<()>;

    /// 列出全部会话摘要
    fn list(&self) -> Vec<SessionSummary>;

    /// 取得完整会话记录
    fn history(&self, session_id: &str) -> Option<Session>;

    /// 当前会话数量
    fn active_count(&self) -> usize;
}

/// 内存会话存储实现
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, session_id: Option<&str>) -> String {
        let id = match session_id {
            Some(existing) if !existing.is_empty() => existing.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        self.sessions
            .entry(id.clone())
            .or_insert_with(|| Session::with_id(id.clone()));

        id
    }

    fn append_exchange(
        &self,
        session_id: &str,
        question: &str,
        answer: &str,
        emotion: Emotion,
    ) -> Result<()> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))?;

        session.push_exchange(question, answer, emotion);
        Ok(())
    }

    fn reset(&self, session_id: &str) -> Result<()> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))?;

        session.clear();
        Ok(())
    }

    fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| SessionSummary {
                id: entry.id.clone(),
                created: entry.created_at,
                message_count: entry.message_count,
            })
            .collect();

        summaries.sort_by(|a, b| a.created.cmp(&b.created));
        summaries
    }

    fn history(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
    }

    fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

/// 创建会话存储
pub fn create_session_store() -> Box<dyn SessionStore> {
    Box::new(InMemorySessionStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::MAX_HISTORY;

    #[test]
    fn test_get_or_create_mints_unseen_ids() {
        let store = InMemorySessionStore::new();

        let first = store.get_or_create(None);
        let second = store.get_or_create(None);

        assert_ne!(first, second);
        assert_eq!(store.active_count(), 2);
    }

    #[test]
    fn test_get_or_create_preserves_existing_history() {
        let store = InMemorySessionStore::new();

        let id = store.get_or_create(None);
        store
            .append_exchange(&id, "q", "a", Emotion::Neutral)
            .unwrap();

        let same = store.get_or_create(Some(&id));

        assert_eq!(same, id);
        assert_eq!(store.history(&id).unwrap().message_count, 1);
    }

    #[test]
    fn test_unknown_id_initializes_empty_record() {
        let store = InMemorySessionStore::new();

        let id = store.get_or_create(Some("client-chosen"));

        assert_eq!(id, "client-chosen");
        let session = store.history("client-chosen").unwrap();
        assert_eq!(session.message_count, 0);
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_history_is_capped_and_most_recent() {
        let store = InMemorySessionStore::new();
        let id = store.get_or_create(None);

        for i in 0..30 {
            store
                .append_exchange(&id, &format!("q{}", i), "a", Emotion::Neutral)
                .unwrap();
        }

        let session = store.history(&id).unwrap();
        assert_eq!(session.history.len(), MAX_HISTORY);
        assert_eq!(session.message_count, 30);
        assert_eq!(session.history.last().unwrap().question, "q29");
        assert_eq!(session.history.first().unwrap().question, "q10");
    }

    #[test]
    fn test_reset_leaves_other_sessions_untouched() {
        let store = InMemorySessionStore::new();
        let a = store.get_or_create(None);
        let b = store.get_or_create(None);
        store.append_exchange(&a, "q", "a", Emotion::Happy).unwrap();
        store.append_exchange(&b, "q", "a", Emotion::Happy).unwrap();

        store.reset(&a).unwrap();

        assert_eq!(store.history(&a).unwrap().message_count, 0);
        assert!(store.history(&a).unwrap().history.is_empty());
        assert_eq!(store.history(&b).unwrap().message_count, 1);
    }

    #[test]
    fn test_reset_unknown_session_is_not_found() {
        let store = InMemorySessionStore::new();
        assert!(matches!(
            store.reset("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_append_is_safe_under_concurrency() {
        let store = std::sync::Arc::new(InMemorySessionStore::new());
        let id = store.get_or_create(None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .append_exchange(&id, "q", "a", Emotion::Neutral)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let session = store.history(&id).unwrap();
        assert_eq!(session.message_count, 200);
        assert_eq!(session.history.len(), MAX_HISTORY);
    }
}
