//! 语言模型模块
//!
//! 定义对话模型的能力接口和各后端实现，后端在配置阶段一次性选定。

pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::config::config::LlmConfig;
use crate::error::{AppError, Result};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 一条对话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// 对话模型能力接口
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// 对一串消息生成一条回答
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String>;
}

// ===== OpenAI 兼容后端 =====

/// Chat Completions 协议的请求/响应结构
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI Chat Completions API client.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model_name.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("chat completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "chat completion failed with {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("invalid chat completion response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::Llm("chat completion returned no content".to_string()))
    }
}

// ===== Ollama 后端 =====

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

#[derive(Deserialize)]
struct OllamaChatMessage {
    content: String,
}

/// Ollama 本地模型客户端
pub struct OllamaChatModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaChatModel {
    pub fn new(base_url: &str, model: &str, timeout: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": messages,
                "stream": false
            }))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("ollama chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!("ollama chat failed: {}", error_text)));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("invalid ollama chat response: {}", e)))?;

        Ok(chat_response.message.content)
    }
}

// ===== 抽取式后端 =====

/// 无网络依赖的抽取式后端
///
/// 从提示词携带的上下文里挑出与问题词面重合度最高的句子作为回答。
/// 用于开发环境和测试，不依赖任何托管模型。
pub struct ExtractiveChatModel;

impl ExtractiveChatModel {
    pub fn new() -> Self {
        Self
    }

    fn context_of(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .find_map(|message| message.content.split("Context:").nth(1))
            .map(|rest| {
                rest.split("Question:")
                    .next()
                    .unwrap_or(rest)
                    .trim()
                    .to_string()
            })
            .unwrap_or_default()
    }

    fn question_of(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| match message.content.split("Question:").nth(1) {
                Some(question) => question
                    .split("Helpful Answer:")
                    .next()
                    .unwrap_or(question)
                    .trim()
                    .to_string(),
                None => message.content.trim().to_string(),
            })
            .unwrap_or_default()
    }

    fn keywords(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.len() > 2)
            .map(|word| word.to_string())
            .collect()
    }
}

impl Default for ExtractiveChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for ExtractiveChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let context = Self::context_of(messages);
        let question_words = Self::keywords(&Self::question_of(messages));

        let best = context
            .split(['.', '!', '?', '\n'])
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(|sentence| {
                let overlap = Self::keywords(sentence)
                    .intersection(&question_words)
                    .count();
                (overlap, sentence)
            })
            .max_by_key(|(overlap, _)| *overlap);

        match best {
            Some((overlap, sentence)) if overlap > 0 => Ok(format!("{}.", sentence)),
            _ => Ok("I don't know the answer to that yet, but it's a good question!".to_string()),
        }
    }
}

/// 按配置创建对话模型
pub fn create_chat_model(config: &LlmConfig) -> Result<Box<dyn ChatModel>> {
    match config.backend.as_str() {
        "openai" => Ok(Box::new(OpenAiChatModel::new(config)?)),
        "ollama" => Ok(Box::new(OllamaChatModel::new(
            &config.base_url,
            &config.model_name,
            config.request_timeout,
        )?)),
        _ => Ok(Box::new(ExtractiveChatModel::new())),
    }
}
