//! 语音服务
//!
//! 语音识别与语音合成的提供方调度。提供方在配置阶段一次性选定，
//! 运行期失败沿降级链退到永不失败的本地提供方，结果携带来源标记，
//! 调用方可以分辨降级输出。

pub mod stt;
pub mod tts;

pub use stt::{LocalSttProvider, create_stt_provider};
pub use tts::{LocalTtsProvider, create_tts_provider};

use async_trait::async_trait;
use tracing::warn;

use crate::config::config::SpeechConfig;
use crate::error::Result;
use crate::models::emotion::Emotion;

/// 语音识别提供方
#[async_trait]
pub trait SttProvider: Send + Sync {
    /// 提供方名称，用于来源标记
    fn name(&self) -> &'static str;

    /// 把音频转写为文本
    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String>;
}

/// 语音合成提供方
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// 提供方名称，用于来源标记
    fn name(&self) -> &'static str;

    /// 把文本合成为 MP3 音频
    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        voice: &str,
        speed: f32,
    ) -> Result<Vec<u8>>;
}

/// 转写结果
#[derive(Debug, Clone)]
pub struct Transcription {
    /// 转写文本
    pub text: String,
    /// 实际产出结果的提供方
    pub provider: &'static str,
    /// 是否为降级输出
    pub degraded: bool,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// MP3 音频字节
    pub audio: Vec<u8>,
    /// 音频格式
    pub format: &'static str,
    /// 实际产出结果的提供方
    pub provider: &'static str,
    /// 是否为降级输出
    pub degraded: bool,
}

/// 语音桥
///
/// 把配置的提供方和本地兜底串成降级链：提供方出错时记录原因并
/// 退到本地提供方，本地提供方保证成功（最坏情况给占位文本或空音频）。
pub struct SpeechBridge {
    stt: Box<dyn SttProvider>,
    tts: Box<dyn TtsProvider>,
    stt_fallback: LocalSttProvider,
    tts_fallback: LocalTtsProvider,
}

impl SpeechBridge {
    pub fn new(stt: Box<dyn SttProvider>, tts: Box<dyn TtsProvider>) -> Self {
        Self {
            stt,
            tts,
            stt_fallback: LocalSttProvider,
            tts_fallback: LocalTtsProvider,
        }
    }

    /// 音频转文本，失败时降级
    pub async fn speech_to_text(&self, audio: &[u8], format: &str) -> Transcription {
        match self.stt.transcribe(audio, format).await {
            Ok(text) => Transcription {
                text,
                provider: self.stt.name(),
                degraded: false,
            },
            Err(cause) => {
                warn!(provider = self.stt.name(), %cause, "STT provider failed, falling back");
                let text = self
                    .stt_fallback
                    .transcribe(audio, format)
                    .await
                    .unwrap_or_default();
                Transcription {
                    text,
                    provider: self.stt_fallback.name(),
                    degraded: self.stt.name() != self.stt_fallback.name(),
                }
            }
        }
    }

    /// 文本转音频，失败时降级
    pub async fn text_to_speech(
        &self,
        text: &str,
        emotion: Emotion,
        voice: &str,
        speed: f32,
    ) -> SynthesizedAudio {
        match self.tts.synthesize(text, emotion, voice, speed).await {
            Ok(audio) => SynthesizedAudio {
                audio,
                format: "mp3",
                provider: self.tts.name(),
                degraded: false,
            },
            Err(cause) => {
                warn!(provider = self.tts.name(), %cause, "TTS provider failed, falling back");
                let audio = self
                    .tts_fallback
                    .synthesize(text, emotion, voice, speed)
                    .await
                    .unwrap_or_default();
                SynthesizedAudio {
                    audio,
                    format: "mp3",
                    provider: self.tts_fallback.name(),
                    degraded: self.tts.name() != self.tts_fallback.name(),
                }
            }
        }
    }
}

/// 按配置创建语音桥
pub fn create_speech_bridge(config: &SpeechConfig) -> Result<SpeechBridge> {
    let stt = create_stt_provider(config)?;
    let tts = create_tts_provider(config)?;
    Ok(SpeechBridge::new(stt, tts))
}
