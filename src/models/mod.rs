//! 数据模型模块

pub mod chunk;
pub mod emotion;
pub mod session;

pub use chunk::{DocumentChunk, RawDocument, ScoredChunk};
pub use emotion::Emotion;
pub use session::{Exchange, MAX_HISTORY, Session};
