//! Timecode formatting
//!
//! Converts float seconds to the fixed-width timecode strings required by
//! SRT, VTT, and ASS, plus the reverse conversion for manual time entry.
//! Sub-unit precision truncates rather than rounds, so a re-parsed
//! timecode never lands past the original float.

use std::time::Duration;

use crate::error::{Result, SubtitleError};

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Whole milliseconds in `seconds`, truncated.
///
/// The float is converted at nanosecond precision first, so a value like
/// `12.345` (stored as `12.344999...`) still truncates to 12345 ms.
fn total_millis(seconds: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SubtitleError::InvalidTime(seconds.to_string()));
    }
    let d = Duration::try_from_secs_f64(seconds)
        .map_err(|_| SubtitleError::InvalidTime(seconds.to_string()))?;
    Ok((d.as_nanos() / 1_000_000) as u64)
}

/// Format seconds as an SRT timecode: `HH:MM:SS,mmm`.
///
/// Hours pad to two digits and grow past 99 without wrapping.
pub fn srt_timecode(seconds: f64) -> Result<String> {
    let ms = total_millis(seconds)?;
    Ok(format_millis(ms, ','))
}

/// Format seconds as a VTT timecode: `HH:MM:SS.mmm`.
pub fn vtt_timecode(seconds: f64) -> Result<String> {
    let ms = total_millis(seconds)?;
    Ok(format_millis(ms, '.'))
}

/// Format seconds as an ASS timecode: `H:MM:SS.cc`.
///
/// Centisecond resolution, no leading zero on the hour.
pub fn ass_timecode(seconds: f64) -> Result<String> {
    let ms = total_millis(seconds)?;
    let cs = (ms / 10) % 100;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    Ok(format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs))
}

fn format_millis(ms: u64, ms_sep: char) -> String {
    let milli = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{:02}:{:02}:{:02}{}{:03}", hours, mins, secs, ms_sep, milli)
}

/// Parse a timecode in any of the three supported syntaxes back to float
/// seconds. Accepts a comma or dot before the fraction and a 2-digit
/// (centisecond) or 3-digit (millisecond) fraction.
pub fn parse_timecode(s: &str) -> Result<f64> {
    let caps = regex!(r"^(\d+):(\d{2}):(\d{2})[.,](\d{2,3})$")
        .captures(s.trim())
        .ok_or_else(|| SubtitleError::InvalidTime(s.to_string()))?;

    // The hour field alone is unbounded in width.
    let hours: u64 = caps[1]
        .parse()
        .map_err(|_| SubtitleError::InvalidTime(s.to_string()))?;
    // Unwraps cannot fail: 2-3 digits by construction.
    let mins: u64 = caps[2].parse().unwrap();
    let secs: u64 = caps[3].parse().unwrap();
    let frac: u64 = caps[4].parse().unwrap();

    if hours > 999_999 || mins >= 60 || secs >= 60 {
        return Err(SubtitleError::InvalidTime(s.to_string()));
    }

    let millis = if caps[4].len() == 2 { frac * 10 } else { frac };
    let total_ms = ((hours * 60 + mins) * 60 + secs) * 1000 + millis;
    Ok(total_ms as f64 / 1000.0)
}
