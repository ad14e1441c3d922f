//! Core data model
//!
//! Cues, tracks worth of patch/input types, and the style settings
//! consumed by the ASS exporter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SubtitleError};

/// Opaque identifier for a cue. Unique within a store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(pub(crate) u64);

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single timed subtitle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Store-minted id, stable across edits
    pub id: CueId,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds, strictly greater than `start`
    pub end: f64,
    /// Text content (may contain newlines)
    pub text: String,
    /// Optional speaker label, not emitted by the exporters
    pub speaker: Option<String>,
    /// Optional recognition confidence in `[0.0, 1.0]`
    pub confidence: Option<f32>,
}

impl Cue {
    /// Get the duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside this cue, inclusive on both ends
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Input for a cue that has not been admitted to a store yet.
///
/// Also the wire shape the transcription backend produces: `speaker` and
/// `confidence` default to absent so a bare `{start, end, text}` object
/// deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl NewCue {
    /// Create a new cue input with no speaker or confidence
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            speaker: None,
            confidence: None,
        }
    }

    /// Check the time range against the store admission rules
    pub fn validate(&self) -> Result<()> {
        validate_range(self.start, self.end)
    }

    /// Convert into a stored cue under the given id.
    /// Confidence is clamped into `[0.0, 1.0]`; models routinely
    /// emit values a hair outside the unit interval.
    pub(crate) fn into_cue(self, id: CueId) -> Cue {
        Cue {
            id,
            start: self.start,
            end: self.end,
            text: self.text,
            speaker: self.speaker,
            confidence: self.confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }
}

/// Validate a cue time range: both ends finite and non-negative,
/// `end` strictly after `start`.
pub(crate) fn validate_range(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
        return Err(SubtitleError::InvalidRange { start, end });
    }
    Ok(())
}

/// Partial update for a cue. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CuePatch {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: Option<String>,
    pub speaker: Option<String>,
    pub confidence: Option<f32>,
}

impl CuePatch {
    /// Whether the patch touches the time range
    pub fn moves_timing(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Horizontal alignment of the subtitle band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl fmt::Display for HorizontalAlign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for HorizontalAlign {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(HorizontalAlign::Left),
            "center" => Ok(HorizontalAlign::Center),
            "right" => Ok(HorizontalAlign::Right),
            other => Err(SubtitleError::Config(format!(
                "unknown alignment: {}",
                other
            ))),
        }
    }
}

/// Editor-wide appearance settings. Only the ASS exporter consumes these;
/// SRT and VTT carry no styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    /// Text color as `#RRGGBB`
    pub text_color: String,
    /// Outline color as `#RRGGBB`
    pub outline_color: String,
    /// Outline width in pixels
    pub outline_width: f32,
    /// Background box opacity, `0.0` transparent to `1.0` opaque
    pub background_opacity: f32,
    /// Vertical position of the band as percent from the top of the frame
    pub vertical_position: u32,
    /// Horizontal alignment
    pub alignment: HorizontalAlign,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 22,
            text_color: "#FFFFFF".to_string(),
            outline_color: "#000000".to_string(),
            outline_width: 2.0,
            background_opacity: 0.85,
            vertical_position: 82,
            alignment: HorizontalAlign::Center,
        }
    }
}
