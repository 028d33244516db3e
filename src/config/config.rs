use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
    /// 允许的跨域来源（空表示全部允许）
    pub allowed_origins: Vec<String>,
}

/// 知识库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// 知识库文档目录
    pub dir: PathBuf,
    /// 分块目标大小（字符）
    pub chunk_size: usize,
    /// 相邻分块重叠（字符）
    pub chunk_overlap: usize,
}

/// 向量索引配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VectorConfig {
    /// 索引持久化文件路径
    pub index_path: PathBuf,
    /// 向量维度
    pub dimension: usize,
    /// 检索返回的分块数
    pub top_k: usize,
}

/// 嵌入模型配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// 模型名称
    pub model_name: String,
    /// Embedding 后端类型: "ollama" 或 "hash"
    pub backend: String,
    /// 批处理大小
    pub batch_size: usize,
    /// Ollama 服务器地址
    pub ollama_url: String,
    /// Ollama 请求超时（秒）
    pub ollama_timeout: u64,
}

/// 语言模型配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// 后端类型: "openai"、"ollama" 或 "extractive"
    pub backend: String,
    /// 模型名称
    pub model_name: String,
    /// API 密钥
    pub api_key: String,
    /// API 基地址（OpenAI 兼容端点）
    pub base_url: String,
    /// 采样温度
    pub temperature: f32,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

/// 语音服务配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpeechConfig {
    /// 是否启用语音识别
    pub stt_enabled: bool,
    /// 是否启用语音合成
    pub tts_enabled: bool,
    /// STT 提供方: "openai"、"google"、"huggingface" 或 "local"
    pub stt_provider: String,
    /// TTS 提供方: "google"、"elevenlabs"、"openai" 或 "local"
    pub tts_provider: String,
    /// OpenAI API 密钥
    pub openai_api_key: String,
    /// Google API 密钥
    pub google_api_key: String,
    /// ElevenLabs API 密钥
    pub elevenlabs_api_key: String,
    /// Hugging Face API 密钥
    pub huggingface_api_key: String,
    /// 提供方请求超时（秒）
    pub request_timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// 后端 API 基地址
    pub api_url: String,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 知识库配置
    pub knowledge: KnowledgeConfig,
    /// 向量索引配置
    pub vector: VectorConfig,
    /// 嵌入模型配置
    pub embedding: EmbeddingConfig,
    /// 语言模型配置
    pub llm: LlmConfig,
    /// 语音服务配置
    pub speech: SpeechConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 客户端配置
    pub client: ClientConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8000,
                request_timeout: 30,
                max_request_size: 10 * 1024 * 1024,
                allowed_origins: vec!["http://localhost:3000".into()],
            },
            knowledge: KnowledgeConfig {
                dir: PathBuf::from("knowledge_base"),
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            vector: VectorConfig {
                index_path: PathBuf::from("./data/index.json"),
                dimension: 384,
                top_k: 3,
            },
            embedding: EmbeddingConfig {
                model_name: "all-MiniLM-L6-v2".into(),
                backend: "hash".into(),
                batch_size: 32,
                ollama_url: "http://localhost:11434".into(),
                ollama_timeout: 60,
            },
            llm: LlmConfig {
                backend: "extractive".into(),
                model_name: "gpt-3.5-turbo".into(),
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".into(),
                temperature: 0.7,
                request_timeout: 60,
            },
            speech: SpeechConfig {
                stt_enabled: true,
                tts_enabled: true,
                stt_provider: "openai".into(),
                tts_provider: "google".into(),
                openai_api_key: String::new(),
                google_api_key: String::new(),
                elevenlabs_api_key: String::new(),
                huggingface_api_key: String::new(),
                request_timeout: 30,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
            },
            client: ClientConfig {
                api_url: "http://127.0.0.1:8000".into(),
            },
            app_name: "owlet".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config
    }
}
