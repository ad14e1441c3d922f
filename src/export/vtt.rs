//! WebVTT generator

use crate::error::Result;
use crate::timecode::vtt_timecode;
use crate::types::Cue;

/// Generate a WebVTT document.
///
/// A `WEBVTT` header followed by one block per cue. Unlike SRT, blocks
/// carry no numeric index.
pub fn generate_vtt(cues: &[Cue]) -> Result<String> {
    let mut output = String::new();
    output.push_str("WEBVTT\n\n");
    for cue in cues {
        output.push_str(&format!(
            "{} --> {}\n",
            vtt_timecode(cue.start)?,
            vtt_timecode(cue.end)?
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }
    Ok(output)
}
