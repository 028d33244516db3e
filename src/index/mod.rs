//! 索引模块
//!
//! 嵌入模型与向量索引的组合，负责知识库的建库与检索。

pub mod embedding;
pub mod vector;

pub use embedding::{EmbeddingModel, create_embedding_model};
pub use vector::{MemoryVectorIndex, VectorIndex, create_vector_index};

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest;
use crate::models::chunk::{DocumentChunk, ScoredChunk};

/// 知识索引服务
///
/// `rebuild` 是幂等的：重建会替换既有内容并重新持久化。
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// 用给定分块重建索引并持久化
    async fn rebuild(&self, chunks: Vec<DocumentChunk>) -> Result<usize>;

    /// 按相似度检索至多 k 个分块，最接近者在前
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;

    /// 索引中的分块数量
    async fn len(&self) -> Result<usize>;
}

pub struct KnowledgeIndexImpl {
    embedding_model: Box<dyn EmbeddingModel>,
    vector_index: Box<dyn VectorIndex>,
    index_path: PathBuf,
}

impl KnowledgeIndexImpl {
    pub fn new(
        embedding_model: Box<dyn EmbeddingModel>,
        vector_index: Box<dyn VectorIndex>,
        index_path: PathBuf,
    ) -> Self {
        Self {
            embedding_model,
            vector_index,
            index_path,
        }
    }
}

#[async_trait]
impl KnowledgeIndex for KnowledgeIndexImpl {
    async fn rebuild(&self, chunks: Vec<DocumentChunk>) -> Result<usize> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self.embedding_model.encode_batch(&texts).await?;

        self.vector_index.clear().await?;
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            let id = format!("{}#{}", chunk.source, chunk.seq);
            self.vector_index.add(&id, &vector, chunk).await?;
        }

        let count = self.vector_index.count().await?;
        self.vector_index.save(&self.index_path).await?;
        Ok(count)
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let vector = self.embedding_model.encode(query).await?;
        self.vector_index.search(&vector, k).await
    }

    async fn len(&self) -> Result<usize> {
        self.vector_index.count().await
    }
}

pub fn create_knowledge_index(
    embedding_model: Box<dyn EmbeddingModel>,
    vector_index: Box<dyn VectorIndex>,
    index_path: PathBuf,
) -> Box<dyn KnowledgeIndex> {
    Box::new(KnowledgeIndexImpl::new(
        embedding_model,
        vector_index,
        index_path,
    ))
}

/// 启动时准备知识索引
///
/// 持久化文件存在则直接加载，否则从知识库目录摄取并建库。
/// 失败对进程启动是致命的，由调用方向上传播。
pub async fn bootstrap_index(config: &AppConfig) -> Result<Box<dyn KnowledgeIndex>> {
    let embedding_model = create_embedding_model(&config.embedding, config.vector.dimension)?;
    let vector_index = create_vector_index(config.vector.dimension);

    if config.vector.index_path.exists() {
        let count = vector_index.load(&config.vector.index_path).await?;
        info!("Vector index loaded with {} chunks", count);
    }

    let index = create_knowledge_index(
        embedding_model,
        vector_index,
        config.vector.index_path.clone(),
    );

    if index.len().await? == 0 {
        info!("Setting up knowledge index...");
        let chunks = ingest::ingest_directory(&config.knowledge)?;
        let count = index.rebuild(chunks).await?;
        info!("Knowledge index built and persisted with {} chunks", count);
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::embedding::HashEmbeddingModel;

    fn test_index(dir: &std::path::Path) -> KnowledgeIndexImpl {
        KnowledgeIndexImpl::new(
            Box::new(HashEmbeddingModel::new(128)),
            create_vector_index(128),
            dir.join("index.json"),
        )
    }

    #[tokio::test]
    async fn test_rebuild_then_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_index(dir.path());

        let chunks = vec![
            DocumentChunk::new("Python is a high-level programming language.", "kb.txt", 0),
            DocumentChunk::new("Bananas are rich in potassium.", "fruit.txt", 0),
        ];
        let count = index.rebuild(chunks).await.unwrap();
        assert_eq!(count, 2);

        let results = index.retrieve("What is Python?", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].chunk.content.contains("Python"));
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_index(dir.path());

        let chunks = vec![DocumentChunk::new("first corpus", "a.txt", 0)];
        index.rebuild(chunks).await.unwrap();

        let replacement = vec![
            DocumentChunk::new("second corpus", "b.txt", 0),
            DocumentChunk::new("second corpus continued", "b.txt", 1),
        ];
        let count = index.rebuild(replacement).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(index.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rebuild_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_index(dir.path());

        index
            .rebuild(vec![DocumentChunk::new("persisted text", "p.txt", 0)])
            .await
            .unwrap();

        assert!(dir.path().join("index.json").exists());
    }
}
