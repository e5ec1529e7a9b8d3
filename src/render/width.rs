//! Display-width helpers for composing portal lines.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 3;

/// Length in bytes of the escape sequence starting at `pos`, if any.
///
/// Recognizes CSI (`ESC [ .. final`) and OSC (`ESC ] .. BEL` or `ESC ] .. ESC \`).
fn ansi_len(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) {
        return None;
    }
    match bytes.get(pos + 1)? {
        b'[' => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if (0x40..=0x7e).contains(&bytes[idx]) {
                    return Some(idx + 1 - pos);
                }
                idx += 1;
            }
            None
        }
        b']' => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if bytes[idx] == 0x07 {
                    return Some(idx + 1 - pos);
                }
                if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
                    return Some(idx + 2 - pos);
                }
                idx += 1;
            }
            None
        }
        _ => None,
    }
}

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Visible width of `input`, ignoring ANSI control sequences.
pub fn visible_width(input: &str) -> usize {
    let mut width = 0;
    let mut idx = 0;
    while idx < input.len() {
        if let Some(len) = ansi_len(input, idx) {
            idx += len;
            continue;
        }
        let end = next_ansi_or_end(input, idx);
        width += input[idx..end].graphemes(true).map(grapheme_width).sum::<usize>();
        idx = end;
    }
    width
}

fn next_ansi_or_end(input: &str, from: usize) -> usize {
    let mut idx = from;
    while idx < input.len() {
        if ansi_len(input, idx).is_some() {
            return idx;
        }
        idx += input[idx..].chars().next().map_or(1, char::len_utf8);
    }
    input.len()
}

const ANSI_RESET: &str = "\x1b[0m";

/// Truncates `line` to at most `width` columns and pads it to exactly `width`.
///
/// Escape sequences are copied through until the cut; a styled line that gets cut
/// is closed with a reset so the style does not bleed into the padding. Tabs are
/// expanded to spaces, and a wide grapheme that would straddle the limit is
/// replaced by padding.
pub fn fit_to_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len().max(width));
    let mut used = 0;
    let mut idx = 0;
    let mut styled = false;
    let mut truncated = false;
    while idx < line.len() && !truncated {
        if let Some(len) = ansi_len(line, idx) {
            out.push_str(&line[idx..idx + len]);
            styled = true;
            idx += len;
            continue;
        }
        let end = next_ansi_or_end(line, idx);
        for grapheme in line[idx..end].graphemes(true) {
            let w = grapheme_width(grapheme);
            if used + w > width {
                truncated = true;
                break;
            }
            if grapheme == "\t" {
                out.push_str(&" ".repeat(TAB_WIDTH));
            } else {
                out.push_str(grapheme);
            }
            used += w;
        }
        idx = end;
    }
    if truncated && styled {
        out.push_str(ANSI_RESET);
    }
    out.push_str(&" ".repeat(width - used));
    out
}
