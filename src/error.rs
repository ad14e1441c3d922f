use thiserror::Error;

use crate::types::CueId;

/// Main error type for the subtitle editing core
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A cue range with `end <= start`, or a negative/non-finite time
    #[error("Invalid cue range: start={start}, end={end}")]
    InvalidRange { start: f64, end: f64 },

    /// An operation targeted a cue id that is not in the track
    #[error("Cue not found: track={track}, id={id}")]
    CueNotFound { track: String, id: CueId },

    /// An operation targeted a track that does not exist
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// A split point outside the open interval of the cue being split
    #[error("Split point {at} out of range ({start}, {end})")]
    OutOfRange { at: f64, start: f64, end: f64 },

    /// A time value the formatter cannot represent
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A transcription job is already in flight for the track
    #[error("Transcription already in progress for track: {0}")]
    AlreadyInProgress(String),

    /// No transcription job exists for the track
    #[error("No transcription job for track: {0}")]
    JobNotFound(String),

    /// An error originating from the transcription backend
    #[error("Transcription error: {0}")]
    Transcribe(#[from] TranscribeError),

    /// Configuration or credentials file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transcription backend failures
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// Transport failure or a non-quota HTTP error from the provider
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The provider returned HTTP 429
    #[error("Provider quota exceeded")]
    QuotaExceeded,

    /// The request did not complete within the configured deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The provider response could not be parsed into cue candidates
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The media payload exceeds the inline upload limit
    #[error("Media payload of {size} bytes exceeds limit of {limit} bytes")]
    MediaTooLarge { size: usize, limit: usize },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SubtitleError>;
