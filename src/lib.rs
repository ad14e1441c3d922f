pub(crate) mod api;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod export;
pub(crate) mod store;
pub(crate) mod timecode;
pub(crate) mod transcribe;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use api::*;
pub use config::{AiConfig, AiSettings, CredentialsFile, SettingsFile};
pub use error::{Result, SubtitleError, TranscribeError};
pub use export::{generate_ass, generate_srt, generate_vtt, ExportFormat};
pub use store::{CueStore, Track};
pub use timecode::{ass_timecode, parse_timecode, srt_timecode, vtt_timecode};
pub use transcribe::{
    apply_outcome, GeminiClient, JobOutcome, JobStatus, MediaPayload, TranscribeMode,
    TranscribeRequest, TranscribeService, TranscriptionBackend,
};
pub use types::{Cue, CueId, CuePatch, HorizontalAlign, NewCue, StyleSettings};
