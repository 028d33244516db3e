//! 知识库摄取模块
//!
//! 从文档目录加载语料并切分为检索分块。

pub mod splitter;

pub use splitter::TextSplitter;

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::config::config::KnowledgeConfig;
use crate::error::{AppError, Result};
use crate::models::chunk::{DocumentChunk, RawDocument};

/// 目录为空时播种的示例文档文件名
const SAMPLE_FILE_NAME: &str = "sample.txt";

/// 示例知识库文档
const SAMPLE_DOCUMENT: &str = "\
Welcome to the AI Tutor System!

This is a sample knowledge base document. You can add your own documents here.

Topics covered:
- Python Programming
- Machine Learning
- Data Science
- Natural Language Processing

Python is a high-level programming language known for its simplicity and readability.
Machine Learning is a subset of AI that enables systems to learn from data.
Data Science combines statistics, programming, and domain expertise to extract insights from data.
Natural Language Processing helps computers understand and generate human language.
";

/// 语料为空时合成的占位文档
const PLACEHOLDER_DOCUMENT: &str =
    "This is an AI tutor system. Add documents to the knowledge base folder.";

/// 加载知识库目录下的全部文档
///
/// 目录不存在时创建并播种示例文档；`.txt` 全量加载，`.pdf` 尽力而为
/// （单个 PDF 解析失败只记录日志，不中断摄取）；结果为空时合成占位文档。
pub fn load_documents(dir: &Path) -> Result<Vec<RawDocument>> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Ingest(format!("cannot create {}: {}", dir.display(), e)))?;
        fs::write(dir.join(SAMPLE_FILE_NAME), SAMPLE_DOCUMENT)
            .map_err(|e| AppError::Ingest(format!("cannot seed sample document: {}", e)))?;
        info!("Created knowledge base directory {} with sample document", dir.display());
    }

    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|e| AppError::Ingest(format!("cannot read {}: {}", dir.display(), e)))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut documents = Vec::new();

    for path in entries {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") => {
                let content = fs::read_to_string(&path)
                    .map_err(|e| AppError::Ingest(format!("cannot read {}: {}", path.display(), e)))?;
                documents.push(RawDocument::new(path.display().to_string(), content));
            }
            Some("pdf") => match pdf_extract::extract_text(&path) {
                Ok(content) => {
                    documents.push(RawDocument::new(path.display().to_string(), content));
                }
                Err(e) => {
                    warn!("Could not load PDF file {}: {}", path.display(), e);
                }
            },
            _ => {}
        }
    }

    if documents.is_empty() {
        warn!("No documents found in knowledge base, synthesizing placeholder");
        documents.push(RawDocument::new("placeholder", PLACEHOLDER_DOCUMENT));
    }

    Ok(documents)
}

/// 加载并分块整个知识库目录
pub fn ingest_directory(config: &KnowledgeConfig) -> Result<Vec<DocumentChunk>> {
    let documents = load_documents(&config.dir)?;
    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap);

    let mut chunks = Vec::new();
    for document in &documents {
        for (seq, piece) in splitter.split(&document.content).into_iter().enumerate() {
            chunks.push(DocumentChunk::new(piece, document.source.clone(), seq));
        }
    }

    info!(
        "Split {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_directory_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let kb = dir.path().join("kb");

        let documents = load_documents(&kb).unwrap();

        assert!(kb.join(SAMPLE_FILE_NAME).exists());
        assert_eq!(documents.len(), 1);
        assert!(documents[0].content.contains("Python is a high-level programming language"));
    }

    #[test]
    fn test_empty_directory_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();

        let documents = load_documents(dir.path()).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].source, "placeholder");
    }

    #[test]
    fn test_txt_files_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        fs::write(dir.path().join("ignored.md"), "gamma").unwrap();

        let documents = load_documents(dir.path()).unwrap();

        assert_eq!(documents.len(), 2);
        assert!(documents.iter().any(|d| d.content == "alpha"));
        assert!(documents.iter().any(|d| d.content == "beta"));
    }

    #[test]
    fn test_broken_pdf_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.txt"), "text content").unwrap();
        fs::write(dir.path().join("broken.pdf"), b"not a real pdf").unwrap();

        let documents = load_documents(dir.path()).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, "text content");
    }

    #[test]
    fn test_ingest_directory_tags_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.txt"), "one two three").unwrap();
        let config = KnowledgeConfig {
            dir: dir.path().to_path_buf(),
            chunk_size: 1000,
            chunk_overlap: 200,
        };

        let chunks = ingest_directory(&config).unwrap();

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].source.ends_with("doc.txt"));
        assert_eq!(chunks[0].seq, 0);
    }
}
