use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::observability::AppMetrics;
use crate::services::query::QueryProcessor;
use crate::services::session::SessionStore;
use crate::services::speech::SpeechBridge;

/// Application state containing all shared services
///
/// Built once during startup and handed to handlers by reference;
/// there are no lazily initialized globals behind it.
#[derive(Clone)]
pub struct AppState {
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
    /// Session store for conversation bookkeeping
    pub sessions: Arc<dyn SessionStore>,
    /// Query processor for the RAG pipeline
    pub query_processor: Arc<dyn QueryProcessor>,
    /// Speech bridge for STT/TTS provider dispatch
    pub speech: Arc<SpeechBridge>,
    /// Application metrics
    pub metrics: AppMetrics,
    /// Process start time, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config.app_name)
            .field("sessions", &"Arc<dyn SessionStore>")
            .field("query_processor", &"Arc<dyn QueryProcessor>")
            .field("speech", &"Arc<SpeechBridge>")
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: AppConfig,
        sessions: Box<dyn SessionStore>,
        query_processor: Box<dyn QueryProcessor>,
        speech: SpeechBridge,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::from(sessions),
            query_processor: Arc::from(query_processor),
            speech: Arc::new(speech),
            metrics: AppMetrics::default(),
            started_at: Utc::now(),
        }
    }
}
