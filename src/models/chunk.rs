//! 文档分块模型

use serde::{Deserialize, Serialize};

/// 原始文档
///
/// 加载阶段的产物，尚未分块。
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// 来源文件路径
    pub source: String,
    /// 全文内容
    pub content: String,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// 文档分块
///
/// 检索的最小单元。在摄取时创建，之后不可变；仅在重建索引时销毁。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    /// 分块文本
    pub content: String,
    /// 来源文件路径
    pub source: String,
    /// 在来源文档中的序号
    pub seq: usize,
}

impl DocumentChunk {
    pub fn new(content: impl Into<String>, source: impl Into<String>, seq: usize) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            seq,
        }
    }
}

/// 带相似度得分的分块
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// 分块
    pub chunk: DocumentChunk,
    /// 余弦相似度得分
    pub score: f32,
}
