//! Test fixtures for integration tests
//!
//! Canned transcripts and a scriptable backend so the whole transcribe
//! flow can run without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TranscribeError;
use crate::store::CueStore;
use crate::transcribe::{TranscribeRequest, TranscriptionBackend};
use crate::types::{Cue, NewCue};

/// A canned transcript
#[derive(Debug, Clone)]
pub struct TestTranscript {
    pub name: &'static str,
    pub cues: Vec<NewCue>,
}

impl TestTranscript {
    /// Two-cue clip the golden export tests are written against
    pub fn short_clip() -> Self {
        Self {
            name: "short_clip",
            cues: vec![
                NewCue::new(0.0, 3.5, "Welcome"),
                NewCue::new(3.8, 7.2, "Today"),
            ],
        }
    }

    /// Product demo transcript with speakers and confidences, the shape
    /// a real transcription lands in
    pub fn product_demo() -> Self {
        let mut cues = vec![
            NewCue::new(0.0, 3.5, "Welcome to our product demonstration video."),
            NewCue::new(
                3.8,
                7.2,
                "Today we'll be showing you the key features of SubtitleAI.",
            ),
            NewCue::new(
                7.5,
                11.8,
                "Our platform uses advanced AI to generate accurate subtitles.",
            ),
            NewCue::new(12.0, 15.3, "Let's start by looking at the upload process."),
            NewCue::new(24.8, 28.5, "What makes this different from other tools?"),
            NewCue::new(
                29.0,
                33.8,
                "Great question. Our AI doesn't just transcribe, it refines the text.",
            ),
        ];
        let speakers = ["Host", "Host", "Host", "Host", "Guest", "Host"];
        let confidences = [0.98, 0.96, 0.94, 0.97, 0.95, 0.91];
        for (cue, (speaker, confidence)) in
            cues.iter_mut().zip(speakers.iter().zip(confidences))
        {
            cue.speaker = Some(speaker.to_string());
            cue.confidence = Some(confidence);
        }
        Self {
            name: "product_demo",
            cues,
        }
    }

    /// Spanish rendition of the short clip, for translation tests
    pub fn short_clip_spanish() -> Self {
        Self {
            name: "short_clip_spanish",
            cues: vec![
                NewCue::new(0.0, 3.5, "Bienvenido"),
                NewCue::new(3.8, 7.2, "Hoy"),
            ],
        }
    }
}

/// A store seeded with the short clip on a "master" track.
pub fn fixture_store() -> CueStore {
    let mut store = CueStore::new();
    store
        .replace_track("master", TestTranscript::short_clip().cues)
        .unwrap();
    store
}

/// Backend that replays queued responses in order. Running past the end
/// of the queue fails the request.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<std::result::Result<Vec<NewCue>, TranscribeError>>>,
    insights: &'static str,
}

impl ScriptedBackend {
    pub fn with_responses(
        responses: Vec<std::result::Result<Vec<NewCue>, TranscribeError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            insights: "1. Hook one. 2. Hook two. 3. Hook three. Summary: a demo.",
        }
    }

    pub fn with_response(
        response: std::result::Result<Vec<NewCue>, TranscribeError>,
    ) -> Self {
        Self::with_responses(vec![response])
    }
}

#[async_trait]
impl TranscriptionBackend for ScriptedBackend {
    async fn generate(
        &self,
        _request: TranscribeRequest,
    ) -> std::result::Result<Vec<NewCue>, TranscribeError> {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TranscribeError::RequestFailed(
                "no scripted response left".to_string(),
            ))
        })
    }

    async fn generate_insights(
        &self,
        _cues: &[Cue],
    ) -> std::result::Result<String, TranscribeError> {
        Ok(self.insights.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_transcripts_are_admissible() {
        for transcript in [
            TestTranscript::short_clip(),
            TestTranscript::product_demo(),
            TestTranscript::short_clip_spanish(),
        ] {
            assert!(!transcript.cues.is_empty(), "{}", transcript.name);
            for cue in &transcript.cues {
                assert!(cue.validate().is_ok(), "{}: {:?}", transcript.name, cue);
            }
        }
    }

    #[test]
    fn test_fixture_store_seeded() {
        let store = fixture_store();
        assert_eq!(store.track("master").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_backend_replays_in_order() {
        let backend = ScriptedBackend::with_responses(vec![
            Ok(TestTranscript::short_clip().cues),
            Err(TranscribeError::QuotaExceeded),
        ]);
        let request =
            TranscribeRequest::rewrite(crate::transcribe::TranscribeMode::Refine, Vec::new());
        assert_eq!(backend.generate(request.clone()).await.unwrap().len(), 2);
        assert!(matches!(
            backend.generate(request.clone()).await,
            Err(TranscribeError::QuotaExceeded)
        ));
        // Queue exhausted.
        assert!(backend.generate(request).await.is_err());
    }
}
