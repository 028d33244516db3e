//! 查询处理
//!
//! 检索增强的问答管线：检索上下文、调用语言模型、标注情绪。
//! 内部失败永远不向调用方传播，而是降级为固定的道歉回答。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::index::KnowledgeIndex;
use crate::llm::{ChatModel, prompt};
use crate::models::emotion::Emotion;
use crate::models::session::Exchange;
use crate::services::emotion;

/// 每次检索使用的分块数，同时也是响应携带的来源上限
const RETRIEVE_K: usize = 3;

/// 内部失败时返回的固定道歉回答
const APOLOGY: &str =
    "I apologize, but I encountered an error processing your question. Please try rephrasing it.";

/// 查询模式
///
/// 会话模式携带按会话注入的历史，没有进程级共享的记忆对象。
pub enum QueryMode<'a> {
    /// 单问，无历史
    Stateless,
    /// 会话式，携带调用方会话的历史
    Conversational(&'a [Exchange]),
}

/// 一次查询的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// 回答文本
    pub text: String,
    /// 情绪标签
    pub emotion: Emotion,
    /// 来源标识（至多 3 个，不保证去重）
    pub sources: Vec<String>,
    /// 产生时间
    pub timestamp: DateTime<Utc>,
}

/// 查询处理器
#[async_trait]
pub trait QueryProcessor: Send + Sync {
    /// 处理一个问题，失败时降级而不是报错
    async fn process<'a>(&self, question: &str, mode: QueryMode<'a>) -> QueryResult;
}

pub struct QueryProcessorImpl {
    index: Arc<dyn KnowledgeIndex>,
    chat_model: Arc<dyn ChatModel>,
}

impl QueryProcessorImpl {
    pub fn new(index: Arc<dyn KnowledgeIndex>, chat_model: Arc<dyn ChatModel>) -> Self {
        Self { index, chat_model }
    }

    async fn answer(&self, question: &str, mode: &QueryMode<'_>) -> crate::error::Result<QueryResult> {
        let retrieved = self.index.retrieve(question, RETRIEVE_K).await?;
        let context = prompt::format_context(&retrieved);

        let messages = match mode {
            QueryMode::Stateless => prompt::build_query_messages(&context, question),
            QueryMode::Conversational(history) => {
                prompt::build_conversational_messages(&context, history, question)
            }
        };

        let text = self.chat_model.generate(&messages).await?;
        let emotion = emotion::classify(&text);

        let sources: Vec<String> = retrieved
            .iter()
            .take(RETRIEVE_K)
            .map(|scored| scored.chunk.source.clone())
            .collect();

        debug!(emotion = %emotion, sources = sources.len(), "query processed");

        Ok(QueryResult {
            text,
            emotion,
            sources,
            timestamp: Utc::now(),
        })
    }

    fn apology() -> QueryResult {
        QueryResult {
            text: APOLOGY.to_string(),
            emotion: Emotion::Confused,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl QueryProcessor for QueryProcessorImpl {
    async fn process<'a>(&self, question: &str, mode: QueryMode<'a>) -> QueryResult {
        match self.answer(question, &mode).await {
            Ok(result) => result,
            Err(cause) => {
                error!(%cause, "query processing failed, returning degraded answer");
                Self::apology()
            }
        }
    }
}

/// 创建查询处理器
pub fn create_query_processor(
    index: Arc<dyn KnowledgeIndex>,
    chat_model: Arc<dyn ChatModel>,
) -> Box<dyn QueryProcessor> {
    Box::new(QueryProcessorImpl::new(index, chat_model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::index::{create_knowledge_index, create_vector_index};
    use crate::index::embedding::HashEmbeddingModel;
    use crate::llm::{ChatMessage, ExtractiveChatModel};
    use crate::models::chunk::DocumentChunk;

    async fn indexed_processor(dir: &std::path::Path) -> QueryProcessorImpl {
        let index: Arc<dyn KnowledgeIndex> = Arc::from(create_knowledge_index(
            Box::new(HashEmbeddingModel::new(128)),
            create_vector_index(128),
            dir.join("index.json"),
        ));
        index
            .rebuild(vec![DocumentChunk::new(
                "Python is a high-level programming language.",
                "kb/sample.txt",
                0,
            )])
            .await
            .unwrap();

        QueryProcessorImpl::new(index, Arc::new(ExtractiveChatModel::new()))
    }

    #[tokio::test]
    async fn test_stateless_query_returns_sources_and_valid_emotion() {
        let dir = tempfile::tempdir().unwrap();
        let processor = indexed_processor(dir.path()).await;

        let result = processor
            .process("What is Python?", QueryMode::Stateless)
            .await;

        assert!(!result.sources.is_empty());
        assert!(Emotion::ALL.contains(&result.emotion));
        assert!(result.text.contains("Python"));
    }

    #[tokio::test]
    async fn test_conversational_mode_accepts_history() {
        let dir = tempfile::tempdir().unwrap();
        let processor = indexed_processor(dir.path()).await;
        let history = vec![Exchange {
            question: "What is Python?".into(),
            answer: "A programming language.".into(),
            emotion: Emotion::Explaining,
            timestamp: Utc::now(),
        }];

        let result = processor
            .process("Tell me more about Python", QueryMode::Conversational(&history))
            .await;

        assert!(!result.text.is_empty());
        assert!(!result.sources.is_empty());
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn generate(&self, _messages: &[ChatMessage]) -> crate::error::Result<String> {
            Err(AppError::Llm("provider unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_llm_failure_degrades_to_apology() {
        let dir = tempfile::tempdir().unwrap();
        let index: Arc<dyn KnowledgeIndex> = Arc::from(create_knowledge_index(
            Box::new(HashEmbeddingModel::new(64)),
            create_vector_index(64),
            dir.path().join("index.json"),
        ));
        let processor = QueryProcessorImpl::new(index, Arc::new(FailingModel));

        let result = processor.process("anything", QueryMode::Stateless).await;

        assert_eq!(result.text, APOLOGY);
        assert_eq!(result.emotion, Emotion::Confused);
        assert!(result.sources.is_empty());
    }
}
