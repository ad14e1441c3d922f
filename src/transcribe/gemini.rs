//! Gemini backend
//!
//! Talks to the Google Generative Language `generateContent` endpoint.
//! Media goes inline as base64; cue-shaped responses are requested as
//! JSON. Text rewrites retry on the configured backoff schedule; media
//! transcription is a single attempt.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::backend::{parse_cue_payload, MediaPayload, TranscribeRequest, TranscriptionBackend};
use super::TranscribeMode;
use crate::config::AiConfig;
use crate::error::{Result, SubtitleError, TranscribeError};
use crate::types::{Cue, NewCue};

const SYSTEM_REFINE: &str = "Professional Script Editor.";
const SYSTEM_TRANSLATE: &str = "Professional Multilingual Translator.";
const SYSTEM_TONE: &str = "Creative Screenwriter.";
const SYSTEM_INSIGHTS: &str = "Expert Social Media Strategist.";

const TRANSCRIBE_PROMPT: &str = "Transcribe this media file. Return JSON: \
    { \"subtitles\": [{ \"start\": float, \"end\": float, \"text\": \"string\" }] }. \
    Keep segments under 4 seconds.";

/// Client for the Gemini `generateContent` endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: AiConfig,
}

impl GeminiClient {
    /// Create a client from configuration.
    pub fn new(config: AiConfig) -> Result<GeminiClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SubtitleError::Config(format!("http client: {}", e)))?;
        Ok(GeminiClient {
            inner: Arc::new(Inner { http, config }),
        })
    }

    fn url(&self) -> String {
        let config = &self.inner.config;
        format!(
            "{}/{}:generateContent?key={}",
            config.endpoint.trim_end_matches('/'),
            config.model,
            config.api_key
        )
    }

    /// One POST to the endpoint, mapped to the error taxonomy.
    async fn call_once(&self, payload: &Value) -> std::result::Result<String, TranscribeError> {
        let config = &self.inner.config;
        // The key is in the URL, log the model only.
        debug!("calling gemini model {}", config.model);
        let response = self
            .inner
            .http
            .post(self.url())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscribeError::Timeout(config.request_timeout_secs)
                } else {
                    TranscribeError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscribeError::QuotaExceeded);
        }
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(TranscribeError::RequestFailed(message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))?;
        extract_text(&body)
    }

    /// Run a call through the backoff schedule. An empty schedule means a
    /// single attempt.
    async fn call_with_retry(
        &self,
        payload: &Value,
    ) -> std::result::Result<String, TranscribeError> {
        let delays = &self.inner.config.retry_delays;
        let mut attempt = 0;
        loop {
            match self.call_once(payload).await {
                Ok(text) => return Ok(text),
                // Only failed requests are retry-eligible; a response that
                // arrived but did not parse surfaces at once.
                Err(e @ TranscribeError::MalformedResponse(_)) => return Err(e),
                Err(e) if attempt < delays.len() => {
                    warn!(
                        "gemini attempt {} failed ({}), retrying in {}s",
                        attempt + 1,
                        e,
                        delays[attempt]
                    );
                    tokio::time::sleep(Duration::from_secs(delays[attempt])).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn transcribe_payload(
        &self,
        media: &MediaPayload,
    ) -> std::result::Result<Value, TranscribeError> {
        let limit = self.inner.config.max_media_bytes;
        if media.len() > limit {
            return Err(TranscribeError::MediaTooLarge {
                size: media.len(),
                limit,
            });
        }
        let data = base64::engine::general_purpose::STANDARD.encode(&media.bytes);
        Ok(json!({
            "contents": [{
                "parts": [
                    { "text": TRANSCRIBE_PROMPT },
                    { "inlineData": { "mimeType": media.mime_type, "data": data } },
                ]
            }],
            "generationConfig": { "responseMimeType": "application/json" },
        }))
    }

    fn rewrite_payload(
        &self,
        mode: &TranscribeMode,
        cues: &[Cue],
    ) -> std::result::Result<Value, TranscribeError> {
        let input = serde_json::to_string(cues)
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;
        let (prompt, system) = match mode {
            TranscribeMode::Refine => (
                format!(
                    "Refine grammar and flow. Keep timestamps identical. \
                     Return JSON format: {{ \"subtitles\": [...] }}. Input: {}",
                    input
                ),
                SYSTEM_REFINE,
            ),
            TranscribeMode::Translate(lang) => (
                format!(
                    "Translate these subtitles to {}. Preserve context and timing. \
                     Return JSON format: {{ \"subtitles\": [...] }}. Input: {}",
                    lang, input
                ),
                SYSTEM_TRANSLATE,
            ),
            TranscribeMode::Tone(name) => (
                format!(
                    "Rewrite in {} tone. Keep timing. \
                     Return JSON format: {{ \"subtitles\": [...] }}. Input: {}",
                    name, input
                ),
                SYSTEM_TONE,
            ),
            TranscribeMode::Transcribe => {
                return Err(TranscribeError::RequestFailed(
                    "transcribe mode is not a text rewrite".to_string(),
                ))
            }
        };
        Ok(json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system }] },
            "generationConfig": { "responseMimeType": "application/json" },
        }))
    }
}

/// Pull the first candidate's text out of a `generateContent` response.
fn extract_text(body: &Value) -> std::result::Result<String, TranscribeError> {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            TranscribeError::MalformedResponse("response has no candidate text".to_string())
        })
}

#[async_trait]
impl TranscriptionBackend for GeminiClient {
    async fn generate(
        &self,
        request: TranscribeRequest,
    ) -> std::result::Result<Vec<NewCue>, TranscribeError> {
        let text = match &request.mode {
            TranscribeMode::Transcribe => {
                let media = request.media.as_ref().ok_or_else(|| {
                    TranscribeError::RequestFailed(
                        "transcribe request carries no media".to_string(),
                    )
                })?;
                let payload = self.transcribe_payload(media)?;
                self.call_once(&payload).await?
            }
            mode => {
                let payload = self.rewrite_payload(mode, &request.cues)?;
                self.call_with_retry(&payload).await?
            }
        };
        parse_cue_payload(&text)
    }

    async fn generate_insights(
        &self,
        cues: &[Cue],
    ) -> std::result::Result<String, TranscribeError> {
        let transcript: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
        let prompt = format!(
            "Generate 3 viral social hooks and a 2-sentence summary based on this content: {}",
            transcript.join(" ")
        );
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSIGHTS }] },
        });
        self.call_with_retry(&payload).await
    }
}
