//! 嵌入模型服务

use async_trait::async_trait;
use reqwest;
use serde::Deserialize;
use std::hash::{Hash, Hasher};

use crate::config::config::EmbeddingConfig;
use crate::error::Result;

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;
    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
}

/// 特征哈希嵌入模型
///
/// 无网络依赖的确定性后端：词和字符三元组哈希到固定维度桶，
/// 结果做 L2 归一化。检索质量有限，但同一输入永远得到同一向量。
pub struct HashEmbeddingModel {
    dimension: usize,
}

impl HashEmbeddingModel {
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0);
        Self { dimension }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            vector[self.bucket(word)] += 1.0;

            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let key: String = trigram.iter().collect();
                vector[self.bucket(&key)] += 0.5;
            }
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingModel for HashEmbeddingModel {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Ollama Embedding 模型客户端
pub struct OllamaEmbeddingModel {
    client: reqwest::Client,
    model_name: String,
    base_url: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbeddingModel {
    pub fn new(base_url: &str, model_name: &str, timeout: u64, dimension: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            model_name: model_name.to_string(),
            base_url: base_url.to_string(),
            dimension,
        })
    }

    async fn embed(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&serde_json::json!({
                "model": self.model_name,
                "input": texts,
                "truncate": true
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(crate::error::AppError::Embedding(format!(
                "Ollama embedding failed: {}",
                error_text
            )));
        }

        let embed_response: OllamaEmbedResponse = response.json().await?;
        Ok(embed_response.embeddings)
    }
}

#[async_trait]
impl EmbeddingModel for OllamaEmbeddingModel {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(vec![text]).await?;
        Ok(embeddings
            .into_iter()
            .next()
            .unwrap_or_else(|| vec![0.0; self.dimension]))
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        // Ollama 支持批量输入，但为了稳定性，分批处理
        let batch_size = 32;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(batch_size) {
            let chunk_vec: Vec<&str> = chunk.to_vec();
            let embeddings = self.embed(chunk_vec).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

pub fn create_embedding_model(
    config: &EmbeddingConfig,
    dimension: usize,
) -> Result<Box<dyn EmbeddingModel>> {
    match config.backend.as_str() {
        "ollama" => {
            let model = OllamaEmbeddingModel::new(
                &config.ollama_url,
                &config.model_name,
                config.ollama_timeout,
                dimension,
            )?;
            Ok(Box::new(model))
        }
        _ => {
            let model = HashEmbeddingModel::new(dimension);
            Ok(Box::new(model))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedding_is_deterministic() {
        let model = HashEmbeddingModel::new(128);

        let a = model.encode("Python is a programming language").await.unwrap();
        let b = model.encode("Python is a programming language").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
    }

    #[tokio::test]
    async fn test_hash_embedding_is_normalized() {
        let model = HashEmbeddingModel::new(64);
        let vector = model.encode("hello world").await.unwrap();
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_similar_text_scores_higher() {
        let model = HashEmbeddingModel::new(256);
        let query = model.encode("what is python").await.unwrap();
        let close = model.encode("python is a language").await.unwrap();
        let far = model.encode("bananas grow on trees").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&query, &close) > dot(&query, &far));
    }

    #[tokio::test]
    async fn test_batch_encoding() {
        let model: Box<dyn EmbeddingModel> = Box::new(HashEmbeddingModel::new(64));

        let texts = vec!["hello", "world", "test"];
        let results = model.encode_batch(&texts).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|v| v.len() == 64));
    }
}
