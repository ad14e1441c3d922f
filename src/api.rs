use std::sync::Arc;

use tracing::debug;

use crate::config::AiConfig;
use crate::error::{Result, SubtitleError};
use crate::export::ExportFormat;
use crate::store::CueStore;
use crate::transcribe::{GeminiClient, TranscribeService};
use crate::types::StyleSettings;

/// A track serialized into a downloadable document.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Serialize a track to the given format.
pub fn export_track(
    store: &CueStore,
    track: &str,
    format: ExportFormat,
    style: &StyleSettings,
) -> Result<String> {
    let t = store
        .track(track)
        .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
    debug!("exporting track {} as {} ({} cues)", track, format, t.len());
    format.generate(t.cues(), style)
}

/// Serialize a track into a named download. The base name is the
/// caller's choice; only the extension comes from the format.
pub fn export_file(
    store: &CueStore,
    track: &str,
    format: ExportFormat,
    style: &StyleSettings,
    base_name: &str,
) -> Result<ExportedFile> {
    let contents = export_track(store, track, format, style)?;
    Ok(ExportedFile {
        file_name: format.file_name(base_name),
        mime_type: format.mime_type(),
        contents,
    })
}

/// Build a transcription job service backed by Gemini.
pub fn gemini_service(config: AiConfig) -> Result<TranscribeService> {
    let client = GeminiClient::new(config)?;
    Ok(TranscribeService::new(Arc::new(client)))
}
