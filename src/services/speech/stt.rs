//! Speech-to-text providers.
//!
//! One implementation per hosted provider plus a local stand-in that
//! never fails. Providers are picked once at configuration time.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use std::time::Duration;

use crate::config::config::SpeechConfig;
use crate::error::{AppError, Result};
use crate::services::speech::SttProvider;

/// Transcription returned when no real recognizer is configured.
const PLACEHOLDER_TRANSCRIPTION: &str =
    "This is a placeholder transcription; no speech recognizer is configured.";

fn http_client(timeout: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| AppError::Speech(e.to_string()))
}

// ===== OpenAI Whisper =====

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

/// OpenAI Whisper transcription API.
pub struct OpenAiSttProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiSttProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("OpenAI API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SttProvider for OpenAiSttProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", format))
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::Speech(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", "whisper-1");

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("whisper request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!("whisper failed: {}", error_text)));
        }

        let transcript: WhisperResponse = response
            .json()
            .await
            .map_err(|e| AppError::Speech(format!("invalid whisper response: {}", e)))?;
        Ok(transcript.text.trim().to_string())
    }
}

// ===== Google Cloud Speech =====

#[derive(Deserialize)]
struct GoogleRecognizeResponse {
    #[serde(default)]
    results: Vec<GoogleRecognizeResult>,
}

#[derive(Deserialize)]
struct GoogleRecognizeResult {
    #[serde(default)]
    alternatives: Vec<GoogleRecognizeAlternative>,
}

#[derive(Deserialize)]
struct GoogleRecognizeAlternative {
    #[serde(default)]
    transcript: String,
}

/// Google Cloud Speech-to-Text REST API.
pub struct GoogleSttProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleSttProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("Google API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SttProvider for GoogleSttProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String> {
        let encoding = if format.eq_ignore_ascii_case("webm") {
            "WEBM_OPUS"
        } else {
            "LINEAR16"
        };

        let response = self
            .client
            .post(format!(
                "https://speech.googleapis.com/v1/speech:recognize?key={}",
                self.api_key
            ))
            .json(&serde_json::json!({
                "config": {
                    "encoding": encoding,
                    "sampleRateHertz": 16000,
                    "languageCode": "en-US",
                    "enableAutomaticPunctuation": true
                },
                "audio": { "content": BASE64_STANDARD.encode(audio) }
            }))
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("google stt request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!("google stt failed: {}", error_text)));
        }

        let recognized: GoogleRecognizeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Speech(format!("invalid google stt response: {}", e)))?;

        let transcript = recognized
            .results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .map(|alternative| alternative.transcript.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(transcript.trim().to_string())
    }
}

// ===== Hugging Face inference =====

#[derive(Deserialize)]
struct HuggingFaceResponse {
    text: String,
}

/// Hugging Face hosted Whisper inference.
pub struct HuggingFaceSttProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl HuggingFaceSttProvider {
    pub fn new(api_key: &str, timeout: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::Config("Hugging Face API key not set".to_string()));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            model: "openai/whisper-small".to_string(),
        })
    }
}

#[async_trait]
impl SttProvider for HuggingFaceSttProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn transcribe(&self, audio: &[u8], _format: &str) -> Result<String> {
        let response = self
            .client
            .post(format!(
                "https://api-inference.huggingface.co/models/{}",
                self.model
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Speech(format!("huggingface request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech(format!(
                "huggingface stt failed: {}",
                error_text
            )));
        }

        let transcript: HuggingFaceResponse = response
            .json()
            .await
            .map_err(|e| AppError::Speech(format!("invalid huggingface response: {}", e)))?;
        Ok(transcript.text.trim().to_string())
    }
}

// ===== Local stand-in =====

/// Local stand-in recognizer, always succeeds with a placeholder.
pub struct LocalSttProvider;

#[async_trait]
impl SttProvider for LocalSttProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn transcribe(&self, _audio: &[u8], _format: &str) -> Result<String> {
        Ok(PLACEHOLDER_TRANSCRIPTION.to_string())
    }
}

/// Build the configured STT provider.
///
/// An unknown provider name or a missing key degrades to the local
/// stand-in at configuration time rather than at request time.
pub fn create_stt_provider(config: &SpeechConfig) -> Result<Box<dyn SttProvider>> {
    let provider: Box<dyn SttProvider> = match config.stt_provider.to_lowercase().as_str() {
        "openai" => match OpenAiSttProvider::new(&config.openai_api_key, config.request_timeout) {
            Ok(provider) => Box::new(provider),
            Err(_) => Box::new(LocalSttProvider),
        },
        "google" => match GoogleSttProvider::new(&config.google_api_key, config.request_timeout) {
            Ok(provider) => Box::new(provider),
            Err(_) => Box::new(LocalSttProvider),
        },
        "huggingface" => {
            match HuggingFaceSttProvider::new(&config.huggingface_api_key, config.request_timeout) {
                Ok(provider) => Box::new(provider),
                Err(_) => Box::new(LocalSttProvider),
            }
        }
        _ => Box::new(LocalSttProvider),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_provider_never_fails() {
        let provider = LocalSttProvider;
        let text = provider.transcribe(&[], "webm").await.unwrap();
        assert!(!text.is_empty());
    }

    #[test]
    fn test_unknown_provider_degrades_to_local() {
        let config = SpeechConfig {
            stt_provider: "nonsense".into(),
            ..Default::default()
        };
        let provider = create_stt_provider(&config).unwrap();
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_missing_key_degrades_to_local() {
        let config = SpeechConfig {
            stt_provider: "openai".into(),
            openai_api_key: String::new(),
            request_timeout: 5,
            ..Default::default()
        };
        let provider = create_stt_provider(&config).unwrap();
        assert_eq!(provider.name(), "local");
    }
}
