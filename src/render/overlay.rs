//! Window placement and compositing over a backdrop.

use crate::core::text::slice::{extract_segments, slice_with_width};
use crate::core::text::utils::{fit_to_width, ANSI_RESET};
use crate::core::text::width::visible_width;

/// Where a floating window lands inside the full area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlacement {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl WindowPlacement {
    /// Cell of the window interior's top-left corner (inside the border).
    pub fn interior_origin(&self) -> (usize, usize) {
        (self.col + 1, self.row + 1)
    }

    pub fn interior_size(&self) -> (usize, usize) {
        (
            self.width.saturating_sub(2).max(1),
            self.height.saturating_sub(2).max(1),
        )
    }
}

/// Centers a `window_width` x `window_height` window in a `term_width` x
/// `term_height` area.
///
/// The window is capped to the area width and to one row less than the area
/// height (the bottom row belongs to the footer), centered one row above the
/// true center, and clamped so it never crosses an edge.
pub fn window_placement(
    term_width: usize,
    term_height: usize,
    window_width: usize,
    window_height: usize,
) -> WindowPlacement {
    let term_width = term_width.max(1);
    let term_height = term_height.max(1);

    let width = window_width.min(term_width).max(1);
    let height = window_height
        .min(term_height.saturating_sub(1))
        .max(1);

    let col = (term_width - width) / 2;
    let row = ((term_height - height) / 2).saturating_sub(1);

    WindowPlacement {
        row: row.min(term_height - height),
        col: col.min(term_width - width),
        width,
        height,
    }
}

/// Draws `window` over `backdrop` at `placement`.
///
/// The backdrop is first normalized to exactly `term_height` lines of
/// `term_width` columns, so the result always has that shape.
pub fn composite_window(
    backdrop: &str,
    window: &[String],
    placement: WindowPlacement,
    term_width: usize,
    term_height: usize,
) -> Vec<String> {
    let mut lines: Vec<String> = backdrop
        .split('\n')
        .take(term_height)
        .map(|line| fit_to_width(line, term_width))
        .collect();
    while lines.len() < term_height {
        lines.push(" ".repeat(term_width));
    }

    for (offset, window_line) in window.iter().take(placement.height).enumerate() {
        let idx = placement.row + offset;
        if idx >= lines.len() {
            break;
        }
        lines[idx] = composite_line_at(
            &lines[idx],
            window_line,
            placement.col,
            placement.width,
            term_width,
        );
    }

    lines
}

/// Replaces columns `[start_col, start_col + overlay_width)` of `base_line`
/// with `overlay_line`, keeping the base styling on either side intact.
pub fn composite_line_at(
    base_line: &str,
    overlay_line: &str,
    start_col: usize,
    overlay_width: usize,
    total_width: usize,
) -> String {
    let after_start = start_col.saturating_add(overlay_width);
    let base = extract_segments(
        base_line,
        start_col,
        after_start,
        total_width.saturating_sub(after_start),
    );
    let overlay = slice_with_width(overlay_line, 0, overlay_width);

    let before_pad = start_col.saturating_sub(base.before_width);
    let overlay_pad = overlay_width.saturating_sub(overlay.width);
    let after_pad = total_width
        .saturating_sub(after_start)
        .saturating_sub(base.after_width);

    let mut result = String::with_capacity(base_line.len() + overlay_line.len() + 16);
    result.push_str(&base.before);
    result.push_str(&" ".repeat(before_pad));
    result.push_str(ANSI_RESET);
    result.push_str(&overlay.text);
    result.push_str(&" ".repeat(overlay_pad));
    result.push_str(ANSI_RESET);
    result.push_str(&base.after);
    result.push_str(&" ".repeat(after_pad));

    if visible_width(&result) <= total_width {
        return result;
    }
    slice_with_width(&result, 0, total_width).text
}
