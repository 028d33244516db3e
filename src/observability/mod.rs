//! 可观测性模块
//!
//! 提供基于原子计数器的轻量指标和 Prometheus 文本输出。

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ===== Simple Metrics (using atomics for zero-dep implementation) =====

/// 简单应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub queries_total: Arc<AtomicU64>,
    pub chats_total: Arc<AtomicU64>,
    pub stt_requests_total: Arc<AtomicU64>,
    pub tts_requests_total: Arc<AtomicU64>,
    pub speech_fallbacks_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录单问查询
    pub fn record_query(&self) {
        self.queries_total.fetch_add(1, Ordering::SeqCst);
        self.record_http_request();
    }

    /// 记录会话查询
    pub fn record_chat(&self) {
        self.chats_total.fetch_add(1, Ordering::SeqCst);
        self.record_http_request();
    }

    /// 记录语音识别请求
    pub fn record_stt(&self, degraded: bool) {
        self.stt_requests_total.fetch_add(1, Ordering::SeqCst);
        self.record_http_request();
        if degraded {
            self.speech_fallbacks_total.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 记录语音合成请求
    pub fn record_tts(&self, degraded: bool) {
        self.tts_requests_total.fetch_add(1, Ordering::SeqCst);
        self.record_http_request();
        if degraded {
            self.speech_fallbacks_total.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP queries_total Total stateless queries
# TYPE queries_total counter
queries_total {}
# HELP chats_total Total conversational queries
# TYPE chats_total counter
chats_total {}
# HELP stt_requests_total Total speech-to-text requests
# TYPE stt_requests_total counter
stt_requests_total {}
# HELP tts_requests_total Total text-to-speech requests
# TYPE tts_requests_total counter
tts_requests_total {}
# HELP speech_fallbacks_total Speech requests served by the local fallback
# TYPE speech_fallbacks_total counter
speech_fallbacks_total {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.queries_total.load(Ordering::SeqCst),
            self.chats_total.load(Ordering::SeqCst),
            self.stt_requests_total.load(Ordering::SeqCst),
            self.tts_requests_total.load(Ordering::SeqCst),
            self.speech_fallbacks_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

/// 创建指标路由
pub fn create_observability_router(metrics: AppMetrics) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let metrics = metrics.clone();
            async move { metrics.gather() }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = AppMetrics::default();
        metrics.record_query();
        metrics.record_chat();
        metrics.record_tts(true);

        assert_eq!(metrics.http_requests_total.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.speech_fallbacks_total.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_gather_renders_prometheus_text() {
        let metrics = AppMetrics::default();
        metrics.record_query();

        let text = metrics.gather();
        assert!(text.contains("queries_total 1"));
        assert!(text.contains("# TYPE http_requests_total counter"));
    }
}
