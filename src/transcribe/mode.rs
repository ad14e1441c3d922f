//! Transcription modes

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SubtitleError};

/// What the backend is asked to do with a request.
///
/// The string form is `transcribe`, `translate:<language>`,
/// `refine`, or `tone:<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeMode {
    /// Turn raw media into cues.
    Transcribe,
    /// Rewrite existing cues in another language.
    Translate(String),
    /// Clean up grammar and flow, keeping timestamps.
    Refine,
    /// Rewrite existing cues in a named tone of voice.
    Tone(String),
}

impl TranscribeMode {
    /// Whether a request in this mode carries media bytes. The other
    /// modes rewrite cues that already exist.
    pub fn uses_media(&self) -> bool {
        matches!(self, TranscribeMode::Transcribe)
    }
}

impl fmt::Display for TranscribeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranscribeMode::Transcribe => write!(f, "transcribe"),
            TranscribeMode::Translate(lang) => write!(f, "translate:{}", lang),
            TranscribeMode::Refine => write!(f, "refine"),
            TranscribeMode::Tone(name) => write!(f, "tone:{}", name),
        }
    }
}

impl FromStr for TranscribeMode {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<TranscribeMode> {
        if s == "transcribe" {
            return Ok(TranscribeMode::Transcribe);
        }
        if s == "refine" {
            return Ok(TranscribeMode::Refine);
        }
        if let Some(lang) = s.strip_prefix("translate:") {
            if !lang.is_empty() {
                return Ok(TranscribeMode::Translate(lang.to_string()));
            }
        }
        if let Some(name) = s.strip_prefix("tone:") {
            if !name.is_empty() {
                return Ok(TranscribeMode::Tone(name.to_string()));
            }
        }
        Err(SubtitleError::Config(format!(
            "unknown transcribe mode: {}",
            s
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_round_trip() {
        let cases = [
            ("transcribe", TranscribeMode::Transcribe),
            ("refine", TranscribeMode::Refine),
            (
                "translate:Spanish",
                TranscribeMode::Translate("Spanish".to_string()),
            ),
            ("tone:Dramatic", TranscribeMode::Tone("Dramatic".to_string())),
        ];
        for (s, mode) in cases {
            assert_eq!(s.parse::<TranscribeMode>().unwrap(), mode);
            assert_eq!(mode.to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in ["", "translate", "translate:", "tone:", "summarize"] {
            assert!(s.parse::<TranscribeMode>().is_err(), "{:?}", s);
        }
    }

    #[test]
    fn test_uses_media() {
        assert!(TranscribeMode::Transcribe.uses_media());
        assert!(!TranscribeMode::Refine.uses_media());
        assert!(!TranscribeMode::Translate("fr".to_string()).uses_media());
        assert!(!TranscribeMode::Tone("Casual".to_string()).uses_media());
    }
}
