//! 向量索引服务

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::chunk::{DocumentChunk, ScoredChunk};

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn add(&self, id: &str, vector: &[f32], chunk: DocumentChunk) -> Result<()>;
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<ScoredChunk>>;
    async fn count(&self) -> Result<usize>;
    async fn clear(&self) -> Result<()>;
    async fn save(&self, path: &Path) -> Result<()>;
    async fn load(&self, path: &Path) -> Result<usize>;
}

/// 持久化文件格式
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    dimension: usize,
    entries: Vec<PersistedEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    id: String,
    vector: Vec<f32>,
    chunk: DocumentChunk,
}

/// 内存向量索引
///
/// 余弦相似度暴力检索；分块数量是千级的，线性扫描足够。
pub struct MemoryVectorIndex {
    vectors: dashmap::DashMap<String, (Vec<f32>, DocumentChunk)>,
    dimension: usize,
}

impl MemoryVectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: dashmap::DashMap::new(),
            dimension,
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len());

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn add(&self, id: &str, vector: &[f32], chunk: DocumentChunk) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(AppError::VectorIndex(format!(
                "dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }

        self.vectors
            .insert(id.to_string(), (vector.to_vec(), chunk));

        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(AppError::VectorIndex(format!(
                "dimension mismatch: expected {}, got {}",
                self.dimension,
                query.len()
            )));
        }

        let mut results: Vec<ScoredChunk> = self
            .vectors
            .iter()
            .map(|ref_multi| {
                let (vector, chunk) = ref_multi.value();
                ScoredChunk {
                    chunk: chunk.clone(),
                    score: Self::cosine_similarity(query, vector),
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.vectors.len())
    }

    async fn clear(&self) -> Result<()> {
        self.vectors.clear();
        Ok(())
    }

    async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let persisted = PersistedIndex {
            dimension: self.dimension,
            entries: self
                .vectors
                .iter()
                .map(|ref_multi| {
                    let (vector, chunk) = ref_multi.value();
                    PersistedEntry {
                        id: ref_multi.key().clone(),
                        vector: vector.clone(),
                        chunk: chunk.clone(),
                    }
                })
                .collect(),
        };

        let json = serde_json::to_string(&persisted)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    async fn load(&self, path: &Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)?;
        let persisted: PersistedIndex = serde_json::from_str(&json)?;

        if persisted.dimension != self.dimension {
            return Err(AppError::VectorIndex(format!(
                "persisted index dimension {} does not match configured {}",
                persisted.dimension, self.dimension
            )));
        }

        self.vectors.clear();
        let count = persisted.entries.len();
        for entry in persisted.entries {
            self.vectors.insert(entry.id, (entry.vector, entry.chunk));
        }

        Ok(count)
    }
}

pub fn create_vector_index(dimension: usize) -> Box<dyn VectorIndex> {
    Box::new(MemoryVectorIndex::new(dimension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, seq: usize) -> DocumentChunk {
        DocumentChunk::new(text, "test.txt", seq)
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let index = MemoryVectorIndex::new(3);
        index
            .add("a", &[1.0, 0.0, 0.0], chunk("exact", 0))
            .await
            .unwrap();
        index
            .add("b", &[0.7, 0.7, 0.0], chunk("close", 1))
            .await
            .unwrap();
        index
            .add("c", &[0.0, 0.0, 1.0], chunk("orthogonal", 2))
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "exact");
        assert_eq!(results[1].chunk.content, "close");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let index = MemoryVectorIndex::new(4);
        let result = index.add("a", &[1.0, 0.0], chunk("bad", 0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_clear_empties_index() {
        let index = MemoryVectorIndex::new(2);
        index.add("a", &[1.0, 0.0], chunk("one", 0)).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);

        index.clear().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = MemoryVectorIndex::new(2);
        index.add("a", &[1.0, 0.0], chunk("one", 0)).await.unwrap();
        index.add("b", &[0.0, 1.0], chunk("two", 1)).await.unwrap();
        index.save(&path).await.unwrap();

        let restored = MemoryVectorIndex::new(2);
        let count = restored.load(&path).await.unwrap();

        assert_eq!(count, 2);
        let results = restored.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].chunk.content, "one");
    }

    #[tokio::test]
    async fn test_load_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = MemoryVectorIndex::new(2);
        index.add("a", &[1.0, 0.0], chunk("one", 0)).await.unwrap();
        index.save(&path).await.unwrap();

        let restored = MemoryVectorIndex::new(3);
        assert!(restored.load(&path).await.is_err());
    }
}
