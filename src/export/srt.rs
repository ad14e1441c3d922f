//! SRT generator

use crate::error::Result;
use crate::timecode::srt_timecode;
use crate::types::Cue;

/// Generate an SRT document.
///
/// One block per cue: a 1-based sequential index (cue ids are not used),
/// the time range, the text, and a blank line. Multi-line cue text is
/// emitted as-is; SRT allows it.
pub fn generate_srt(cues: &[Cue]) -> Result<String> {
    let mut output = String::new();
    for (i, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            srt_timecode(cue.start)?,
            srt_timecode(cue.end)?
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }
    Ok(output)
}
