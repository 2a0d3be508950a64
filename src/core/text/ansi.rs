//! Terminal control sequence scanning and SGR state tracking.

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCodeKind {
    Csi,
    Osc,
    Apc,
    Dcs,
    Ss3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
    pub kind: AnsiCodeKind,
}

impl AnsiCode {
    /// `ESC [ ... m`
    pub fn is_sgr(&self) -> bool {
        self.kind == AnsiCodeKind::Csi && self.code.ends_with('m')
    }
}

/// Result of looking at a byte position that may start a control sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeScan {
    /// The position holds ordinary text.
    Text,
    /// A complete, recognized sequence.
    Complete(AnsiCode),
    /// An ESC whose sequence never terminates before the end of input.
    /// Everything from the ESC onwards belongs to it.
    Truncated,
    /// An ESC followed by a byte that does not introduce a known sequence.
    /// Only the ESC itself is consumed.
    Bare,
}

pub fn scan_escape(input: &str, pos: usize) -> EscapeScan {
    let bytes = input.as_bytes();
    if pos >= bytes.len() || bytes[pos] != ESC {
        return EscapeScan::Text;
    }
    if pos + 1 >= bytes.len() {
        return EscapeScan::Truncated;
    }

    let kind = match bytes[pos + 1] {
        b'[' => AnsiCodeKind::Csi,
        b']' => AnsiCodeKind::Osc,
        b'_' => AnsiCodeKind::Apc,
        b'P' => AnsiCodeKind::Dcs,
        b'O' => AnsiCodeKind::Ss3,
        _ => return EscapeScan::Bare,
    };

    let end = match kind {
        AnsiCodeKind::Csi => csi_end(bytes, pos),
        AnsiCodeKind::Ss3 => (pos + 2 < bytes.len()).then_some(pos + 3),
        AnsiCodeKind::Osc | AnsiCodeKind::Apc | AnsiCodeKind::Dcs => string_terminator_end(bytes, pos),
    };

    match end {
        Some(end) => EscapeScan::Complete(AnsiCode {
            code: input[pos..end].to_string(),
            length: end - pos,
            kind,
        }),
        None => EscapeScan::Truncated,
    }
}

/// Returns the complete sequence starting at `pos`, if any.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    match scan_escape(input, pos) {
        EscapeScan::Complete(code) => Some(code),
        _ => None,
    }
}

fn csi_end(bytes: &[u8], pos: usize) -> Option<usize> {
    bytes[pos + 2..]
        .iter()
        .position(|b| (0x40..=0x7e).contains(b))
        .map(|offset| pos + 2 + offset + 1)
}

fn string_terminator_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bytes[idx] == BEL {
            return Some(idx + 1);
        }
        if bytes[idx] == ESC && idx + 1 < bytes.len() && bytes[idx + 1] == b'\\' {
            return Some(idx + 2);
        }
        idx += 1;
    }
    None
}

/// Removes every control sequence, leaving only visible text.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        match scan_escape(input, idx) {
            EscapeScan::Complete(code) => idx += code.length,
            EscapeScan::Truncated => break,
            EscapeScan::Bare => idx += 1,
            EscapeScan::Text => {
                let Some(ch) = input[idx..].chars().next() else {
                    break;
                };
                out.push(ch);
                idx += ch.len_utf8();
            }
        }
    }
    out
}

/// Tracks the SGR attributes in effect at a point in a styled line so that a
/// later segment can be re-opened with the same look.
#[derive(Debug, Default)]
pub struct AnsiCodeTracker {
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    inverse: bool,
    strikethrough: bool,
    fg_color: Option<String>,
    bg_color: Option<String>,
}

impl AnsiCodeTracker {
    pub fn process(&mut self, ansi_code: &str) {
        let Some(params) = ansi_code
            .strip_prefix("\x1b[")
            .and_then(|rest| rest.strip_suffix('m'))
        else {
            return;
        };

        if params.is_empty() || params == "0" {
            self.reset();
            return;
        }

        let parts: Vec<&str> = params.split(';').collect();
        let mut idx = 0;
        while idx < parts.len() {
            let code = parts[idx].parse::<u16>().unwrap_or(0);
            if code == 38 || code == 48 {
                let span = match parts.get(idx + 1) {
                    Some(&"5") => 3,
                    Some(&"2") => 5,
                    _ => 1,
                };
                if span > 1 && idx + span <= parts.len() {
                    let color = parts[idx..idx + span].join(";");
                    if code == 38 {
                        self.fg_color = Some(color);
                    } else {
                        self.bg_color = Some(color);
                    }
                    idx += span;
                    continue;
                }
            }

            match code {
                0 => self.reset(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => self.underline = true,
                7 => self.inverse = true,
                9 => self.strikethrough = true,
                22 => {
                    self.bold = false;
                    self.dim = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                27 => self.inverse = false,
                29 => self.strikethrough = false,
                39 => self.fg_color = None,
                49 => self.bg_color = None,
                30..=37 | 90..=97 => self.fg_color = Some(code.to_string()),
                40..=47 | 100..=107 => self.bg_color = Some(code.to_string()),
                _ => {}
            }
            idx += 1;
        }
    }

    pub fn is_styled(&self) -> bool {
        !self.active_codes().is_empty()
    }

    pub fn active_codes(&self) -> String {
        let mut codes: Vec<&str> = Vec::new();
        let flags = [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.inverse, "7"),
            (self.strikethrough, "9"),
        ];
        codes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, code)| *code));
        if let Some(color) = self.fg_color.as_deref() {
            codes.push(color);
        }
        if let Some(color) = self.bg_color.as_deref() {
            codes.push(color);
        }

        if codes.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", codes.join(";"))
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
