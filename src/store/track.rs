//! A single named subtitle track.

use crate::types::{Cue, CueId};

/// A named, ordered sequence of cues.
///
/// Cues stay sorted by start time after every mutation. The cue id is the
/// tie-break for equal start times, so insertion order is preserved there
/// (ids are minted in ascending order).
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    language: Option<String>,
    cues: Vec<Cue>,
}

impl Track {
    pub(crate) fn new(name: impl Into<String>) -> Track {
        Track {
            name: name.into(),
            language: None,
            cues: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language tag, set when the track was produced by translation.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub(crate) fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    /// All cues, ascending by start time.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn cue(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    /// Last cue in start-time order.
    pub fn last(&self) -> Option<&Cue> {
        self.cues.last()
    }

    pub(crate) fn position(&self, id: CueId) -> Option<usize> {
        self.cues.iter().position(|c| c.id == id)
    }

    pub(crate) fn cue_mut(&mut self, id: CueId) -> Option<&mut Cue> {
        self.cues.iter_mut().find(|c| c.id == id)
    }

    /// Insert keeping (start, id) order.
    pub(crate) fn insert_sorted(&mut self, cue: Cue) {
        let idx = self.cues.partition_point(|c| {
            c.start.total_cmp(&cue.start).then(c.id.cmp(&cue.id)).is_le()
        });
        self.cues.insert(idx, cue);
    }

    pub(crate) fn remove(&mut self, id: CueId) -> Option<Cue> {
        let idx = self.position(id)?;
        Some(self.cues.remove(idx))
    }

    /// Restore (start, id) order after a timing change.
    pub(crate) fn resort(&mut self) {
        self.cues
            .sort_by(|a, b| a.start.total_cmp(&b.start).then(a.id.cmp(&b.id)));
    }

    pub(crate) fn replace_cues(&mut self, mut cues: Vec<Cue>) {
        cues.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.id.cmp(&b.id)));
        self.cues = cues;
    }
}
