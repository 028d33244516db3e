//! Text-to-speech providers.
//!
//! Each provider maps the answer's emotion onto its own voice
//! parameters. The local stand-in always succeeds with empty audio.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use std::time::Duration;

use crate::config::config::SpeechConfig;
use crate::error::{AppError, Result};
use crate::models::emotion::Emotion;
use crate::services::speech::TtsProvider;

fn http_client(timeout: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| AppError::Speech(e.to_string()))
}

// ===== Google Cloud Text-to-Speech =====

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech REST API.
pub struct GoogleTtsProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleTtsProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("Google API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
        })
    }

    fn voice_for(emotion: Emotion) -> &'static str {
        match emotion {
            Emotion::Happy | Emotion::Encouraging => "en-US-Neural2-J",
            _ => "en-US-Neural2-D",
        }
    }
}

#[async_trait]
impl TtsProvider for GoogleTtsProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        _voice: &str,
        speed: f32,
    ) -> Result<Vec<u8>> {
        let pitch = if emotion == Emotion::Confused { 0.5 } else { 1.0 };

        let response = self
            .client
            .post(format!(
                "https://texttospeech.googleapis.com/v1/text:synthesize?key={}",
                self.api_key
            ))
            .json(&serde_json::json!({
                "input": { "text": text },
                "voice": {
                    "languageCode": "en-US",
                    "name": Self::voice_for(emotion)
                },
                "audioConfig": {
                    "audioEncoding": "MP3",
                    "speakingRate": speed,
                    "pitch": pitch
                }
            }))
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("google tts request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!("google tts failed: {}", error_text)));
        }

        let synthesized: GoogleSynthesizeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Speech(format!("invalid google tts response: {}", e)))?;

        BASE64_STANDARD
            .decode(synthesized.audio_content)
            .map_err(|e| AppError::Speech(format!("invalid audio content: {}", e)))
    }
}

// ===== ElevenLabs =====

/// ElevenLabs text-to-speech API.
pub struct ElevenLabsTtsProvider {
    client: reqwest::Client,
    api_key: String,
}

impl ElevenLabsTtsProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("ElevenLabs API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
        })
    }

    fn voice_id_for(emotion: Emotion) -> &'static str {
        match emotion {
            Emotion::Happy => "EXAVITQu4vr4xnSDxMaL",
            Emotion::Explaining => "21m00Tcm4TlvDq8ikWAM",
            Emotion::Thinking => "AZnzlk1XvdvUeBnXmlld",
            Emotion::Confused => "ThT5KcBeYPX3keUQqHPh",
            Emotion::Encouraging => "jBpfuIE2acCO8z3wKNLl",
            Emotion::Neutral => "21m00Tcm4TlvDq8ikWAM",
        }
    }
}

#[async_trait]
impl TtsProvider for ElevenLabsTtsProvider {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        _voice: &str,
        _speed: f32,
    ) -> Result<Vec<u8>> {
        let stability = if emotion == Emotion::Confused { 0.5 } else { 0.75 };
        let style = if matches!(emotion, Emotion::Happy | Emotion::Encouraging) {
            0.5
        } else {
            0.0
        };

        let response = self
            .client
            .post(format!(
                "https://api.elevenlabs.io/v1/text-to-speech/{}",
                Self::voice_id_for(emotion)
            ))
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&serde_json::json!({
                "text": text,
                "model_id": "eleven_monolingual_v1",
                "voice_settings": {
                    "stability": stability,
                    "similarity_boost": 0.75,
                    "style": style,
                    "use_speaker_boost": true
                }
            }))
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("elevenlabs request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!(
                "elevenlabs tts failed: {}",
                error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| AppError::Speech(format!("elevenlabs audio read failed: {}", e)))?;
        Ok(audio.to_vec())
    }
}

// ===== OpenAI =====

/// OpenAI text-to-speech API.
pub struct OpenAiTtsProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiTtsProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("OpenAI API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
        })
    }

    fn voice_for(emotion: Emotion) -> &'static str {
        match emotion {
            Emotion::Happy => "alloy",
            Emotion::Explaining => "nova",
            Emotion::Thinking => "onyx",
            Emotion::Confused => "echo",
            Emotion::Encouraging => "shimmer",
            Emotion::Neutral => "nova",
        }
    }
}

#[async_trait]
impl TtsProvider for OpenAiTtsProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        _voice: &str,
        speed: f32,
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": "tts-1",
                "voice": Self::voice_for(emotion),
                "input": text,
                "speed": speed
            }))
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("openai tts request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!("openai tts failed: {}", error_text)));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| AppError::Speech(format!("openai audio read failed: {}", e)))?;
        Ok(audio.to_vec())
    }
}

// ===== Local stand-in =====

/// Local stand-in synthesizer, always succeeds with empty audio.
pub struct LocalTtsProvider;

#[async_trait]
impl TtsProvider for LocalTtsProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn synthesize(
        &self,
        _text: &str,
        _emotion: Emotion,
        _voice: &str,
        _speed: f32,
    ) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Build the configured TTS provider.
pub fn create_tts_provider(config: &SpeechConfig) -> Result<Box<dyn TtsProvider>> {
    let provider: Box<dyn TtsProvider> = match config.tts_provider.to_lowercase().as_str() {
        "google" => match GoogleTtsProvider::new(&config.google_api_key, config.request_timeout) {
            Ok(provider) => Box::new(provider),
            Err(_) => Box::new(LocalTtsProvider),
        },
        "elevenlabs" => {
            match ElevenLabsTtsProvider::new(&config.elevenlabs_api_key, config.request_timeout) {
                Ok(provider) => Box::new(provider),
                Err(_) => Box::new(LocalTtsProvider),
            }
        }
        "openai" => match OpenAiTtsProvider::new(&config.openai_api_key, config.request_timeout) {
            Ok(provider) => Box::new(provider),
            Err(_) => Box::new(LocalTtsProvider),
        },
        _ => Box::new(LocalTtsProvider),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_provider_never_fails() {
        let provider = LocalTtsProvider;
        let audio = provider
            .synthesize("hello", Emotion::Neutral, "default", 1.0)
            .await
            .unwrap();
        assert!(audio.is_empty());
    }

    #[test]
    fn test_every_emotion_has_a_voice() {
        for emotion in Emotion::ALL {
            assert!(!OpenAiTtsProvider::voice_for(emotion).is_empty());
            assert!(!ElevenLabsTtsProvider::voice_id_for(emotion).is_empty());
            assert!(!GoogleTtsProvider::voice_for(emotion).is_empty());
        }
    }

    #[test]
    fn test_missing_key_degrades_to_local() {
        let config = SpeechConfig {
            tts_provider: "elevenlabs".into(),
            elevenlabs_api_key: String::new(),
            request_timeout: 5,
            ..Default::default()
        };
        let provider = create_tts_provider(&config).unwrap();
        assert_eq!(provider.name(), "local");
    }
}
