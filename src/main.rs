use owlet::api::{self, app_state::AppState};
use owlet::config::{AppConfig, loader::ConfigLoader};
use owlet::index::{self, KnowledgeIndex};
use owlet::llm::create_chat_model;
use owlet::observability::create_observability_router;
use owlet::services::{create_query_processor, create_session_store, create_speech_bridge};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    match &config.logging.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "owlet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None if config.logging.structured => {
            tracing_subscriber::fmt().with_env_filter(filter).json().init();
            None
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing(&config);

    info!("Starting Owlet...");
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    // 摄取或索引失败对进程启动是致命的
    let index = index::bootstrap_index(&config).await?;
    let index: Arc<dyn KnowledgeIndex> = Arc::from(index);
    info!("Knowledge index ready with {} chunks", index.len().await?);

    let chat_model = create_chat_model(&config.llm)?;
    info!("Chat model initialized (backend: {})", config.llm.backend);

    let query_processor = create_query_processor(index, Arc::from(chat_model));
    info!("Query processor initialized");

    let session_store = create_session_store();
    info!("Session store initialized");

    let speech_bridge = create_speech_bridge(&config.speech)?;
    info!(
        "Speech bridge initialized (stt: {}, tts: {})",
        config.speech.stt_provider, config.speech.tts_provider
    );

    let app_state = AppState::new(config.clone(), session_store, query_processor, speech_bridge);
    info!("Application state created");

    let metrics_router = create_observability_router(app_state.metrics.clone());
    let router = metrics_router.merge(api::create_router(app_state));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
