//! Transcription jobs
//!
//! The AI boundary of the editor: a backend trait for the remote
//! generative call, the Gemini implementation of it, and a per-track job
//! service that keeps at most one call in flight per track.

mod backend;
mod gemini;
mod mode;
mod service;

pub use backend::{MediaPayload, TranscribeRequest, TranscriptionBackend};
pub use gemini::GeminiClient;
pub use mode::TranscribeMode;
pub use service::{apply_outcome, JobOutcome, JobStatus, TranscribeService};
