//! Fitting helpers built on top of the slicer.

use super::slice::slice_with_width;
use super::width::visible_width;

pub const ANSI_RESET: &str = "\x1b[0m";

/// Pads or cuts `text` so it occupies exactly `width` columns.
///
/// A cut line that carried control sequences is closed with a reset so its
/// styling cannot bleed into whatever is drawn next to it.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let current = visible_width(text);
    if current == width {
        return text.to_string();
    }
    if current < width {
        let mut padded = String::with_capacity(text.len() + width - current);
        padded.push_str(text);
        padded.push_str(&" ".repeat(width - current));
        return padded;
    }

    let slice = slice_with_width(text, 0, width);
    let mut out = slice.text;
    if out.contains('\x1b') {
        out.push_str(ANSI_RESET);
    }
    if slice.width < width {
        out.push_str(&" ".repeat(width - slice.width));
    }
    out
}

/// Cuts `text` to `max_width` columns, ending it with `ellipsis` when it was too wide.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = visible_width(ellipsis);
    if ellipsis_width >= max_width {
        return slice_with_width(ellipsis, 0, max_width).text;
    }

    let head = slice_with_width(text, 0, max_width - ellipsis_width);
    let mut out = head.text;
    if out.contains('\x1b') {
        out.push_str(ANSI_RESET);
    }
    out.push_str(ellipsis);
    out
}

/// Splits `total` into the left/right padding that centers `inner` columns.
pub fn center_padding(total: usize, inner: usize) -> (usize, usize) {
    let spare = total.saturating_sub(inner);
    let left = spare / 2;
    (left, spare - left)
}
