//! 提示词模板
//!
//! 单问模式和会话模式各有一套固定模板，检索到的上下文填入其中。

use crate::llm::{ChatMessage, Role};
use crate::models::chunk::ScoredChunk;
use crate::models::session::Exchange;

/// 单问模式模板
const QA_TEMPLATE: &str = "You are a helpful AI tutor. Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
Always be encouraging and supportive in your responses.

Context: {context}

Question: {question}

Helpful Answer:";

/// 会话模式系统提示
const CONVERSATIONAL_SYSTEM: &str = "You are a friendly and helpful AI tutor having a conversation with a student.
Use the following pieces of context to answer the question.
If you don't know the answer, just say so politely. Always be encouraging and supportive.
Remember previous questions and build upon them when relevant.

Context: {context}";

/// 把检索结果拼接为上下文文本
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|scored| scored.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 构造单问模式的消息序列
pub fn build_query_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    let prompt = QA_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question);

    vec![ChatMessage::new(Role::User, prompt)]
}

/// 构造会话模式的消息序列，历史以交替轮次传给模型
pub fn build_conversational_messages(
    context: &str,
    history: &[Exchange],
    question: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::new(
        Role::System,
        CONVERSATIONAL_SYSTEM.replace("{context}", context),
    ));

    for exchange in history {
        messages.push(ChatMessage::new(Role::User, exchange.question.clone()));
        messages.push(ChatMessage::new(Role::Assistant, exchange.answer.clone()));
    }

    messages.push(ChatMessage::new(Role::User, question.to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chunk::DocumentChunk;
    use crate::models::emotion::Emotion;

    fn scored(text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: DocumentChunk::new(text, "t.txt", 0),
            score: 1.0,
        }
    }

    #[test]
    fn test_query_messages_embed_context_and_question() {
        let messages = build_query_messages("Python is a language.", "What is Python?");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.contains("Context: Python is a language."));
        assert!(messages[0].content.contains("Question: What is Python?"));
    }

    #[test]
    fn test_conversational_messages_carry_history() {
        let history = vec![Exchange {
            question: "What is ML?".into(),
            answer: "Machine learning.".into(),
            emotion: Emotion::Explaining,
            timestamp: chrono::Utc::now(),
        }];

        let messages = build_conversational_messages("ctx", &history, "What are its uses?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "What is ML?");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].content, "What are its uses?");
    }

    #[test]
    fn test_format_context_joins_chunks() {
        let context = format_context(&[scored("first"), scored("second")]);
        assert_eq!(context, "first\n\nsecond");
    }
}
