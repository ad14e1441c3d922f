//! Advanced SubStation Alpha (ASS) generator
//!
//! Generates a complete `.ass` document:
//! - `[Script Info]` with a fixed 1280x720 playback resolution
//! - `[V4+ Styles]` with a single `Style: Default` line derived from
//!   [`StyleSettings`]
//! - `[Events]` with one `Dialogue:` line per cue
//!
//! Colors use the ASS little-endian `&HBBGGRR&` form; the background box
//! color also carries an alpha byte derived from the style's opacity.

use crate::error::{Result, SubtitleError};
use crate::timecode::ass_timecode;
use crate::types::{Cue, HorizontalAlign, StyleSettings};

/// Playback resolution the style margins are computed against.
const PLAY_RES_X: u32 = 1280;
const PLAY_RES_Y: u32 = 720;

/// Generate an ASS document.
pub fn generate_ass(cues: &[Cue], style: &StyleSettings) -> Result<String> {
    let mut output = String::new();

    // Script info
    output.push_str("[Script Info]\n");
    output.push_str("ScriptType: v4.00+\n");
    output.push_str(&format!("PlayResX: {}\n", PLAY_RES_X));
    output.push_str(&format!("PlayResY: {}\n\n", PLAY_RES_Y));

    // Styles
    output.push_str("[V4+ Styles]\n");
    output.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
         BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
         BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    output.push_str(&format_style(style)?);

    // Events
    output.push_str("\n[Events]\n");
    output.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for cue in cues {
        output.push_str(&format!(
            "Dialogue: 0,{start},{end},Default,,{margin},{margin},{margin},,{text}\n",
            start = ass_timecode(cue.start)?,
            end = ass_timecode(cue.end)?,
            margin = pad_margin(0),
            text = escape_ass_text(&cue.text),
        ));
    }

    Ok(output)
}

fn format_style(style: &StyleSettings) -> Result<String> {
    let primary = ass_color(&style.text_color)?;
    let outline = ass_color(&style.outline_color)?;
    Ok(format!(
        "Style: Default,{font},{size},{primary},{secondary},{outline},{back},\
         0,0,0,0,100,100,0,0,1,{outline_width},0,{alignment},{margin_l},{margin_r},{margin_v},1\n",
        font = style.font_family,
        size = style.font_size,
        primary = primary,
        secondary = primary,
        outline = outline,
        back = ass_back_color(style.background_opacity),
        outline_width = style.outline_width,
        alignment = alignment_code(style.alignment),
        margin_l = pad_margin(10),
        margin_r = pad_margin(10),
        margin_v = pad_margin(margin_v(style.vertical_position)),
    ))
}

/// Numeric alignment code for the bottom row of the SSA keypad layout.
fn alignment_code(align: HorizontalAlign) -> u8 {
    match align {
        HorizontalAlign::Left => 1,
        HorizontalAlign::Center => 2,
        HorizontalAlign::Right => 3,
    }
}

/// Vertical margin in play-space pixels. The style stores the band
/// position as percent from the top of the frame; ASS measures the
/// margin up from the bottom.
fn margin_v(vertical_position: u32) -> u32 {
    PLAY_RES_Y * (100 - vertical_position.min(100)) / 100
}

fn pad_margin(value: u32) -> String {
    format!("{:0>4}", value.min(9999))
}

/// `#RRGGBB` to the little-endian `&HBBGGRR&` form.
fn ass_color(color: &str) -> Result<String> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 {
        return Err(SubtitleError::Config(format!("invalid color: {}", color)));
    }
    let rgb = u32::from_str_radix(hex, 16)
        .map_err(|_| SubtitleError::Config(format!("invalid color: {}", color)))?;
    let (r, g, b) = ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff);
    Ok(format!("&H{:02X}{:02X}{:02X}&", b, g, r))
}

/// Background box color: black with the opacity folded in as an alpha
/// byte (`&HAABBGGRR&`, `00` opaque through `FF` transparent).
fn ass_back_color(opacity: f32) -> String {
    let alpha = ((1.0 - opacity.clamp(0.0, 1.0)) * 255.0).round() as u8;
    format!("&H{:02X}000000&", alpha)
}

/// ASS events are single lines; embedded newlines become the `\N` hard
/// line break.
fn escape_ass_text(text: &str) -> String {
    text.replace('\r', "").replace('\n', "\\N")
}
