//! Column-based slicing of styled text.
//!
//! Columns are terminal cells: every control sequence is zero-width and never
//! advances the column counter, while a wide grapheme advances it by two.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{scan_escape, AnsiCodeTracker, EscapeScan};
use super::width::grapheme_width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceResult {
    pub text: String,
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub before: String,
    pub before_width: usize,
    pub after: String,
    pub after_width: usize,
}

/// Extracts the visible columns `[start, start + width)` of `text`.
///
/// A negative `start` is treated as 0 and a non-positive `width` yields an
/// empty string. Control sequences met before the window opens are dropped,
/// so attributes active at the boundary are lost; sequences met inside the
/// window are copied verbatim. Scanning stops as soon as the window is full.
/// An unterminated sequence at the end of the input is swallowed.
pub fn slice_columns(text: &str, start: isize, width: isize) -> String {
    if width <= 0 {
        return String::new();
    }
    let start = start.max(0) as usize;
    let end = start.saturating_add(width as usize);

    let mut out = String::new();
    let mut col = 0;
    let mut idx = 0;
    while idx < text.len() && col < end {
        match scan_escape(text, idx) {
            EscapeScan::Complete(code) => {
                if col >= start {
                    out.push_str(&code.code);
                }
                idx += code.length;
            }
            EscapeScan::Truncated => break,
            EscapeScan::Bare => idx += 1,
            EscapeScan::Text => {
                let run_end = next_escape_or_end(text, idx);
                for grapheme in text[idx..run_end].graphemes(true) {
                    let width = grapheme_width(grapheme);
                    if col >= start && col + width <= end {
                        out.push_str(grapheme);
                    }
                    col += width;
                    if col >= end {
                        break;
                    }
                }
                idx = run_end;
            }
        }
    }
    out
}

/// Strict slice that re-opens the styling active at `start_col` and reports
/// the produced width.
pub fn slice_with_width(line: &str, start_col: usize, length: usize) -> SliceResult {
    if length == 0 {
        return SliceResult {
            text: String::new(),
            width: 0,
        };
    }

    let end_col = start_col.saturating_add(length);
    let mut tracker = AnsiCodeTracker::default();
    let mut text = String::new();
    let mut width = 0;
    let mut col = 0;
    let mut idx = 0;
    let mut started = false;

    while idx < line.len() && col < end_col {
        match scan_escape(line, idx) {
            EscapeScan::Complete(code) => {
                if started {
                    text.push_str(&code.code);
                } else if code.is_sgr() {
                    tracker.process(&code.code);
                }
                idx += code.length;
            }
            EscapeScan::Truncated => break,
            EscapeScan::Bare => idx += 1,
            EscapeScan::Text => {
                let run_end = next_escape_or_end(line, idx);
                for grapheme in line[idx..run_end].graphemes(true) {
                    let g_width = grapheme_width(grapheme);
                    if col >= start_col && col + g_width <= end_col {
                        if !started {
                            text.push_str(&tracker.active_codes());
                            started = true;
                        }
                        text.push_str(grapheme);
                        width += g_width;
                    }
                    col += g_width;
                    if col >= end_col {
                        break;
                    }
                }
                idx = run_end;
            }
        }
    }

    SliceResult { text, width }
}

/// Splits a base line around a hole `[before_end, after_start)` so something
/// else can be drawn into it. The `after` segment is re-opened with whatever
/// styling was active where it begins.
pub fn extract_segments(line: &str, before_end: usize, after_start: usize, after_len: usize) -> Segments {
    let mut segments = Segments {
        before: String::new(),
        before_width: 0,
        after: String::new(),
        after_width: 0,
    };

    let mut tracker = AnsiCodeTracker::default();
    let mut pending_before = String::new();
    let mut after_started = false;
    let after_end = after_start.saturating_add(after_len);
    let stop_col = if after_len == 0 { before_end } else { after_end };
    let mut col = 0;
    let mut idx = 0;

    while idx < line.len() && col < stop_col {
        match scan_escape(line, idx) {
            EscapeScan::Complete(code) => {
                if code.is_sgr() {
                    tracker.process(&code.code);
                }
                if col < before_end {
                    pending_before.push_str(&code.code);
                } else if after_started && col < after_end {
                    segments.after.push_str(&code.code);
                }
                idx += code.length;
            }
            EscapeScan::Truncated => break,
            EscapeScan::Bare => idx += 1,
            EscapeScan::Text => {
                let run_end = next_escape_or_end(line, idx);
                for grapheme in line[idx..run_end].graphemes(true) {
                    let width = grapheme_width(grapheme);
                    if col < before_end {
                        if col + width <= before_end {
                            segments.before.push_str(&pending_before);
                            pending_before.clear();
                            segments.before.push_str(grapheme);
                            segments.before_width += width;
                        }
                    } else if col >= after_start && col + width <= after_end {
                        if !after_started {
                            segments.after.push_str(&tracker.active_codes());
                            after_started = true;
                        }
                        segments.after.push_str(grapheme);
                        segments.after_width += width;
                    }
                    col += width;
                    if col >= stop_col {
                        break;
                    }
                }
                idx = run_end;
            }
        }
    }

    segments
}

fn next_escape_or_end(line: &str, idx: usize) -> usize {
    line[idx..].find('\x1b').map_or(line.len(), |offset| idx + offset)
}
