//! Dialog chrome: borders, title chips, footer hint line.

use crate::core::component::KeyHint;
use crate::core::text::utils::{center_padding, fit_to_width, truncate_to_width, ANSI_RESET as RESET};
use crate::core::text::width::visible_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

/// Frame used by full-screen dialogs.
pub const ROUNDED: BorderGlyphs = BorderGlyphs {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
};

/// Frame used by windowed dialogs.
pub const DOUBLE: BorderGlyphs = BorderGlyphs {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

const CHIP_STYLE: &str = "\x1b[1;7m";
const KEY_STYLE: &str = "\x1b[1m";

pub fn title_chip(title: &str) -> String {
    format!("{CHIP_STYLE} {title} {RESET}")
}

/// Top border line of `width` columns with the title chip centered in it.
///
/// `corners` selects whether the line starts and ends with corner glyphs.
/// When the chip does not fit in the span between them it takes the whole
/// line and no border glyph is drawn.
pub fn title_rule(title: &str, width: usize, glyphs: &BorderGlyphs, corners: bool) -> String {
    let width = width.max(1);
    let chip = title_chip(title);
    let chip_width = visible_width(&chip);
    let span = if corners { width.saturating_sub(2) } else { width };

    if chip_width > span {
        return fit_to_width(&truncate_to_width(&chip, width, "…"), width);
    }

    let (left, right) = center_padding(span, chip_width);
    let horizontal = glyphs.horizontal.to_string();
    let mut line = String::with_capacity(chip.len() + width * 3);
    if corners {
        line.push(glyphs.top_left);
    }
    line.push_str(&horizontal.repeat(left));
    line.push_str(&chip);
    line.push_str(&horizontal.repeat(right));
    if corners {
        line.push(glyphs.top_right);
    }
    line
}

pub fn bottom_rule(width: usize, glyphs: &BorderGlyphs) -> String {
    let width = width.max(1);
    if width < 2 {
        return glyphs.horizontal.to_string();
    }
    let mut line = String::with_capacity(width * 3);
    line.push(glyphs.bottom_left);
    line.push_str(&glyphs.horizontal.to_string().repeat(width - 2));
    line.push(glyphs.bottom_right);
    line
}

/// Splits rendered content into exactly `height` lines of exactly `width` columns.
pub fn normalize_block(text: &str, width: usize, height: usize) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .take(height)
        .map(|line| fit_to_width(line.trim_end_matches('\r'), width))
        .collect();
    while lines.len() < height {
        lines.push(" ".repeat(width));
    }
    lines
}

/// Wraps interior lines in vertical border glyphs.
pub fn side_walls(body: Vec<String>, glyphs: &BorderGlyphs) -> Vec<String> {
    body.into_iter()
        .map(|line| format!("{}{line}{}", glyphs.vertical, glyphs.vertical))
        .collect()
}

/// Boxes `body` (already `width - 2` columns wide) with a titled frame.
pub fn framed(title: &str, body: Vec<String>, width: usize, glyphs: &BorderGlyphs) -> Vec<String> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(title_rule(title, width, glyphs, true));
    lines.extend(side_walls(body, glyphs));
    lines.push(bottom_rule(width, glyphs));
    lines
}

/// Footer listing key hints, space separated, fitted to `width`.
pub fn footer_line(hints: &[KeyHint], width: usize) -> String {
    let rendered: Vec<String> = hints
        .iter()
        .map(|hint| format!("{KEY_STYLE}{}{RESET} {}", hint.key, hint.label))
        .collect();
    fit_to_width(&rendered.join(" "), width)
}
