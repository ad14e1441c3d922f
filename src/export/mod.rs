//! Subtitle file export
//!
//! Pure generators from an ordered cue slice to the three supported file
//! formats. Generators never mutate their input; the same cues and style
//! produce byte-identical output every time.

mod ass;
mod srt;
mod vtt;

pub use ass::generate_ass;
pub use srt::generate_srt;
pub use vtt::generate_vtt;

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SubtitleError};
use crate::types::{Cue, StyleSettings};

/// A subtitle file format the editor can export to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Srt,
    Vtt,
    Ass,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Srt => "srt",
            ExportFormat::Vtt => "vtt",
            ExportFormat::Ass => "ass",
        }
    }

    /// MIME type for a download of this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Vtt => "text/vtt",
            _ => "text/plain",
        }
    }

    /// Suggested download name for a given base name.
    pub fn file_name(&self, base: &str) -> String {
        format!("{}.{}", base, self.extension())
    }

    /// Generate the document for this format.
    ///
    /// `style` only affects ASS output; SRT and VTT carry no styling.
    pub fn generate(&self, cues: &[Cue], style: &StyleSettings) -> Result<String> {
        match self {
            ExportFormat::Srt => generate_srt(cues),
            ExportFormat::Vtt => generate_vtt(cues),
            ExportFormat::Ass => generate_ass(cues, style),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<ExportFormat> {
        match s.to_ascii_lowercase().as_str() {
            "srt" => Ok(ExportFormat::Srt),
            "vtt" => Ok(ExportFormat::Vtt),
            "ass" => Ok(ExportFormat::Ass),
            other => Err(SubtitleError::Config(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}
