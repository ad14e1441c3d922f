//! Backend contract for the remote generative call
//!
//! The editor core never does speech recognition itself. It hands media
//! or existing cues to a [`TranscriptionBackend`] and gets back raw cue
//! candidates, which are validated on admission to a store. Retries and
//! timeouts live behind the trait; callers see one typed failure per
//! request.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use super::TranscribeMode;
use crate::error::TranscribeError;
use crate::types::{Cue, NewCue};

/// Media attachment for a transcribe request.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl MediaPayload {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> MediaPayload {
        MediaPayload {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One request to the backend.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub mode: TranscribeMode,
    /// Raw media bytes, required by [`TranscribeMode::Transcribe`] and
    /// ignored by the text modes.
    pub media: Option<MediaPayload>,
    /// Existing cues, the input to the text modes.
    pub cues: Vec<Cue>,
}

impl TranscribeRequest {
    /// A media transcription request.
    pub fn transcribe(media: MediaPayload) -> TranscribeRequest {
        TranscribeRequest {
            mode: TranscribeMode::Transcribe,
            media: Some(media),
            cues: Vec::new(),
        }
    }

    /// A text rewrite request over existing cues.
    pub fn rewrite(mode: TranscribeMode, cues: Vec<Cue>) -> TranscribeRequest {
        TranscribeRequest {
            mode,
            media: None,
            cues,
        }
    }
}

/// A remote service that turns media or existing cues into cue candidates.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Run one request and return cue candidates.
    async fn generate(
        &self,
        request: TranscribeRequest,
    ) -> std::result::Result<Vec<NewCue>, TranscribeError>;

    /// Free-form hooks-and-summary copy about the current cues. Not
    /// cue-shaped, so it bypasses the JSON cue parsing.
    async fn generate_insights(
        &self,
        cues: &[Cue],
    ) -> std::result::Result<String, TranscribeError>;
}

#[derive(Deserialize)]
struct SubtitlePayload {
    subtitles: Vec<NewCue>,
}

/// Strip the markdown code fences models sometimes wrap JSON in.
pub(crate) fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Parse the model's cue payload.
///
/// Accepts both shapes the prompts have produced in practice: a
/// `{"subtitles": [...]}` wrapper and a bare JSON array of cue objects.
/// Anything else is a [`TranscribeError::MalformedResponse`].
pub(crate) fn parse_cue_payload(
    text: &str,
) -> std::result::Result<Vec<NewCue>, TranscribeError> {
    let cleaned = strip_code_fences(text);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Err(TranscribeError::MalformedResponse(
            "empty response text".to_string(),
        ));
    }
    if let Ok(payload) = serde_json::from_str::<SubtitlePayload>(trimmed) {
        return Ok(payload.subtitles);
    }
    serde_json::from_str::<Vec<NewCue>>(trimmed)
        .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))
}
