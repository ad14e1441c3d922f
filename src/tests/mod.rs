//! Integration testing module
//!
//! End-to-end tests for the subtitle editing core:
//! - Manual editing through to file export
//! - Transcription jobs landing in the store
//! - Translation creating its own language track
//! - Failure paths leaving the editor usable

pub mod fixtures;
