//! In-memory cue store
//!
//! Owns every subtitle track in an editing session and provides the
//! mutation and query operations the editor is built on:
//!
//! - add, update, delete, and split cues with range validation
//! - playhead lookup of the active cue
//! - wholesale track replacement for transcription results
//!
//! Every failing operation leaves the store exactly as it was. Validation
//! runs before any field is written, so callers can surface the error and
//! keep using the same store.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{Result, SubtitleError};
use crate::types::{validate_range, Cue, CueId, CuePatch, NewCue};

mod track;

pub use track::Track;

/// Text a manually added cue starts out with.
const DEFAULT_CUE_TEXT: &str = "New subtitle";
/// Gap in seconds between the last cue and a manually added one.
const DEFAULT_CUE_GAP: f64 = 0.5;
/// Duration in seconds of a manually added cue.
const DEFAULT_CUE_LEN: f64 = 3.0;

/// Store of named subtitle tracks.
///
/// Tracks are created on first insert and listed in name order. Cue ids
/// come from a store-wide counter and are never reused, not even after
/// the cue that held one is deleted.
#[derive(Debug, Default)]
pub struct CueStore {
    tracks: BTreeMap<String, Track>,
    last_id: u64,
}

impl CueStore {
    pub fn new() -> CueStore {
        CueStore::default()
    }

    fn mint_id(&mut self) -> CueId {
        self.last_id += 1;
        CueId(self.last_id)
    }

    /// Look up a track by name.
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    /// All track names, ascending.
    pub fn list_tracks(&self) -> Vec<String> {
        self.tracks.keys().cloned().collect()
    }

    /// Look up a single cue.
    pub fn cue(&self, track: &str, id: CueId) -> Option<&Cue> {
        self.tracks.get(track)?.cue(id)
    }

    /// Add a cue to a track, creating the track if needed.
    ///
    /// The track stays sorted by start time; a cue with the same start as
    /// an existing one lands after it.
    pub fn add_cue(&mut self, track: &str, cue: NewCue) -> Result<CueId> {
        cue.validate()?;
        let id = self.mint_id();
        let entry = self
            .tracks
            .entry(track.to_string())
            .or_insert_with(|| Track::new(track));
        entry.insert_sorted(cue.into_cue(id));
        debug!("added cue {} to track {}", id, track);
        Ok(id)
    }

    /// Add a placeholder cue the way the editor's "add subtitle" button
    /// does: after the last cue with a small gap, or at the playhead when
    /// the track is empty.
    pub fn add_default_cue(&mut self, track: &str, playhead: f64) -> Result<CueId> {
        if !playhead.is_finite() || playhead < 0.0 {
            return Err(SubtitleError::InvalidTime(playhead.to_string()));
        }
        let start = match self.tracks.get(track).and_then(|t| t.last()) {
            Some(last) => last.end + DEFAULT_CUE_GAP,
            None => playhead,
        };
        let mut cue = NewCue::new(start, start + DEFAULT_CUE_LEN, DEFAULT_CUE_TEXT);
        cue.confidence = Some(1.0);
        self.add_cue(track, cue)
    }

    /// Merge a partial update into a cue.
    ///
    /// The merged time range is validated before anything is written, so
    /// a rejected update leaves the cue untouched.
    pub fn update_cue(&mut self, track: &str, id: CueId, patch: CuePatch) -> Result<()> {
        let t = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
        let moves = patch.moves_timing();
        let cue = t.cue_mut(id).ok_or_else(|| SubtitleError::CueNotFound {
            track: track.to_string(),
            id,
        })?;
        let start = patch.start.unwrap_or(cue.start);
        let end = patch.end.unwrap_or(cue.end);
        validate_range(start, end)?;

        cue.start = start;
        cue.end = end;
        if let Some(text) = patch.text {
            cue.text = text;
        }
        if let Some(speaker) = patch.speaker {
            cue.speaker = Some(speaker);
        }
        if let Some(confidence) = patch.confidence {
            cue.confidence = Some(confidence.clamp(0.0, 1.0));
        }
        if moves {
            t.resort();
        }
        debug!("updated cue {} in track {}", id, track);
        Ok(())
    }

    /// Move a cue to a new start time, keeping its duration.
    ///
    /// This is the timeline drag operation. The start is clamped at zero
    /// rather than rejected so a drag past the left edge pins the cue
    /// there.
    pub fn shift_cue(&mut self, track: &str, id: CueId, new_start: f64) -> Result<()> {
        if !new_start.is_finite() {
            return Err(SubtitleError::InvalidTime(new_start.to_string()));
        }
        let t = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
        let cue = t.cue_mut(id).ok_or_else(|| SubtitleError::CueNotFound {
            track: track.to_string(),
            id,
        })?;
        let duration = cue.duration();
        let start = new_start.max(0.0);
        cue.start = start;
        cue.end = start + duration;
        t.resort();
        debug!("shifted cue {} in track {} to {}s", id, track, start);
        Ok(())
    }

    /// Remove a cue from a track.
    pub fn delete_cue(&mut self, track: &str, id: CueId) -> Result<()> {
        let t = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
        t.remove(id).ok_or_else(|| SubtitleError::CueNotFound {
            track: track.to_string(),
            id,
        })?;
        debug!("deleted cue {} from track {}", id, track);
        Ok(())
    }

    /// Split a cue in two at `at` seconds.
    ///
    /// The first half keeps the original id and covers `[start, at)`, the
    /// second gets a fresh id and covers `[at, end)`. The last two words
    /// of the text move to the second half (see [`split_text`] for the
    /// short-text cases). Fails with `OutOfRange` unless `at` falls
    /// strictly inside the cue.
    pub fn split_cue(&mut self, track: &str, id: CueId, at: f64) -> Result<(CueId, CueId)> {
        let (end, first_text, second_text, speaker, confidence) = {
            let t = self
                .tracks
                .get(track)
                .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
            let cue = t.cue(id).ok_or_else(|| SubtitleError::CueNotFound {
                track: track.to_string(),
                id,
            })?;
            if !(cue.start < at && at < cue.end) {
                return Err(SubtitleError::OutOfRange {
                    at,
                    start: cue.start,
                    end: cue.end,
                });
            }
            let (first, second) = split_text(&cue.text);
            (cue.end, first, second, cue.speaker.clone(), cue.confidence)
        };

        let second_id = self.mint_id();
        // The track was just looked up, these cannot fail.
        let t = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
        let cue = t.cue_mut(id).ok_or_else(|| SubtitleError::CueNotFound {
            track: track.to_string(),
            id,
        })?;
        cue.end = at;
        cue.text = first_text;
        t.insert_sorted(Cue {
            id: second_id,
            start: at,
            end,
            text: second_text,
            speaker,
            confidence,
        });
        debug!("split cue {} at {}s, new cue {}", id, at, second_id);
        Ok((id, second_id))
    }

    /// First cue containing `at`, in start-time order. Both ends of a cue
    /// count as inside.
    pub fn find_active_cue(&self, track: &str, at: f64) -> Option<&Cue> {
        self.tracks.get(track)?.cues().iter().find(|c| c.contains(at))
    }

    /// Overwrite a track with a fresh batch of cues.
    ///
    /// All-or-nothing: every candidate is validated up front, and a single
    /// bad range fails the whole call with the previous track contents
    /// retained. Used when a transcription result lands.
    pub fn replace_track(&mut self, track: &str, cues: Vec<NewCue>) -> Result<()> {
        for cue in &cues {
            cue.validate()?;
        }
        let built: Vec<Cue> = cues
            .into_iter()
            .map(|c| {
                let id = self.mint_id();
                c.into_cue(id)
            })
            .collect();
        let count = built.len();
        let entry = self
            .tracks
            .entry(track.to_string())
            .or_insert_with(|| Track::new(track));
        entry.replace_cues(built);
        info!("replaced track {} with {} cues", track, count);
        Ok(())
    }

    /// Drop a track and all its cues.
    pub fn remove_track(&mut self, track: &str) -> Result<()> {
        if self.tracks.remove(track).is_none() {
            return Err(SubtitleError::TrackNotFound(track.to_string()));
        }
        info!("removed track {}", track);
        Ok(())
    }

    /// Tag a track with a language, as the translation flow does for the
    /// track it creates.
    pub fn set_track_language(&mut self, track: &str, language: Option<String>) -> Result<()> {
        let t = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| SubtitleError::TrackNotFound(track.to_string()))?;
        t.set_language(language);
        Ok(())
    }
}

/// Divide cue text for a split: the last two whitespace-delimited words go
/// to the second half. With exactly two words each half gets one, and with
/// fewer the original text stays put and the second half becomes an
/// ellipsis placeholder.
fn split_text(text: &str) -> (String, String) {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.len() {
        0 | 1 => (text.trim().to_string(), "…".to_string()),
        2 => (words[0].to_string(), words[1].to_string()),
        n => (words[..n - 2].join(" "), words[n - 2..].join(" ")),
    }
}
