use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::Utc;
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::speech_dto::{SttJsonRequest, SttResponse, TtsBase64Response, TtsRequest},
    },
    error::AppError,
    models::emotion::Emotion,
};

/// Audio format assumed when the client does not name one.
const DEFAULT_AUDIO_FORMAT: &str = "webm";

/// Decoded speech-to-text input, from either request shape.
struct SttInput {
    audio: Vec<u8>,
    format: String,
    session_id: Option<String>,
}

async fn read_multipart_input(mut multipart: Multipart) -> Result<SttInput, AppError> {
    let mut audio = None;
    let mut format = None;
    let mut session_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable audio field: {}", e)))?;
                audio = Some(bytes.to_vec());
            }
            "format" => {
                format = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("unreadable format field: {}", e)))?,
                );
            }
            "session_id" => {
                session_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("unreadable session field: {}", e)))?,
                );
            }
            _ => {}
        }
    }

    let audio = audio
        .ok_or_else(|| AppError::Validation("multipart body is missing an audio file".to_string()))?;

    Ok(SttInput {
        audio,
        format: format.unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string()),
        session_id,
    })
}

fn read_json_input(request: SttJsonRequest) -> Result<SttInput, AppError> {
    let audio = BASE64_STANDARD
        .decode(request.audio_base64.as_bytes())
        .map_err(|e| AppError::Validation(format!("audio_base64 is not valid base64: {}", e)))?;

    Ok(SttInput {
        audio,
        format: request
            .format
            .unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string()),
        session_id: request.session_id,
    })
}

/// Convert speech to text.
///
/// Accepts either a multipart upload (`audio` file field) or a JSON
/// body with base64 audio; the two shapes are told apart by the
/// request content type.
pub async fn speech_to_text(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.speech.stt_enabled {
        return Err(AppError::Validation("speech-to-text is disabled".to_string()));
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let input = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("invalid multipart request: {}", e)))?;
        read_multipart_input(multipart).await?
    } else {
        let Json(body) = Json::<SttJsonRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?;
        read_json_input(body)?
    };

    if input.audio.is_empty() {
        return Err(AppError::Validation("audio payload is empty".to_string()));
    }

    debug!(bytes = input.audio.len(), format = %input.format, "transcribing audio");

    let transcription = state
        .speech
        .speech_to_text(&input.audio, &input.format)
        .await;
    state.metrics.record_stt(transcription.degraded);

    Ok(Json(SttResponse {
        text: transcription.text,
        provider: transcription.provider.to_string(),
        degraded: transcription.degraded,
        session_id: input.session_id,
        timestamp: Utc::now(),
    }))
}

fn parse_tts_request(request: &TtsRequest) -> Result<(Emotion, String, f32), AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let emotion = match &request.emotion {
        Some(label) => label
            .parse::<Emotion>()
            .map_err(AppError::Validation)?,
        None => Emotion::Neutral,
    };

    let voice = request
        .voice
        .clone()
        .unwrap_or_else(|| "default".to_string());
    let speed = request.speed.unwrap_or(1.0);
    if !(0.25..=4.0).contains(&speed) {
        return Err(AppError::Validation(
            "speed must be between 0.25 and 4.0".to_string(),
        ));
    }

    Ok((emotion, voice, speed))
}

/// Convert text to speech, streaming the audio bytes back.
///
/// Provenance travels in headers because the body is raw audio.
pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.speech.tts_enabled {
        return Err(AppError::Validation("text-to-speech is disabled".to_string()));
    }

    let (emotion, voice, speed) = parse_tts_request(&request)?;
    debug!(%emotion, %voice, speed, "synthesizing speech");

    let synthesized = state
        .speech
        .text_to_speech(&request.text, emotion, &voice, speed)
        .await;
    state.metrics.record_tts(synthesized.degraded);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(
        "x-speech-provider",
        HeaderValue::from_static(synthesized.provider),
    );
    headers.insert(
        "x-speech-degraded",
        HeaderValue::from_static(if synthesized.degraded { "true" } else { "false" }),
    );

    Ok((headers, synthesized.audio))
}

/// Convert text to speech, returning the audio as base64 JSON.
pub async fn text_to_speech_base64(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.speech.tts_enabled {
        return Err(AppError::Validation("text-to-speech is disabled".to_string()));
    }

    let (emotion, voice, speed) = parse_tts_request(&request)?;

    let synthesized = state
        .speech
        .text_to_speech(&request.text, emotion, &voice, speed)
        .await;
    state.metrics.record_tts(synthesized.degraded);

    Ok(Json(TtsBase64Response {
        audio_base64: BASE64_STANDARD.encode(&synthesized.audio),
        format: synthesized.format.to_string(),
        provider: synthesized.provider.to_string(),
        degraded: synthesized.degraded,
        timestamp: Utc::now(),
    }))
}
