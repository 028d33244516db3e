//! 服务模块

pub mod emotion;
pub mod query;
pub mod session;
pub mod speech;

pub use query::{QueryMode, QueryProcessor, QueryResult, create_query_processor};
pub use session::{SessionStore, SessionSummary, create_session_store};
pub use speech::{SpeechBridge, SynthesizedAudio, Transcription, create_speech_bridge};
