//! Structured input events delivered through the single event stream.

use crate::core::input::{is_printable, parse_key};
use crate::core::text::ansi::{scan_escape, EscapeScan};

/// Input event delivered to dialogs and their content.
///
/// Notes:
/// - `raw` is the exact byte sequence received from the terminal when applicable.
/// - `EscapeTimeout` and `RedrawTick` are synthetic: they are scheduled by the
///   dialog layer and come back through the same stream as terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key { raw: String, key_id: String },
    Text { raw: String, text: String },
    Paste { text: String },
    Mouse(MouseEvent),
    Resize { columns: u16, rows: u16 },
    EscapeTimeout { token: u64 },
    RedrawTick { token: u64 },
    UnknownRaw { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press(MouseButton),
    Release(MouseButton),
    Drag(MouseButton),
    Move,
    ScrollUp,
    ScrollDown,
}

/// Pointer event in 0-based cell coordinates.
///
/// Coordinates are signed because translation into a nested window can move a
/// point left of or above the content origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub column: i32,
    pub row: i32,
    pub kind: MouseKind,
}

impl MouseEvent {
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            column: self.column - dx,
            row: self.row - dy,
            kind: self.kind,
        }
    }
}

impl InputEvent {
    pub fn key(key_id: &str) -> Self {
        Self::Key {
            raw: String::new(),
            key_id: key_id.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::Text {
            raw: text.to_string(),
            text: text.to_string(),
        }
    }

    pub fn is_key(&self, id: &str) -> bool {
        matches!(self, Self::Key { key_id, .. } if key_id == id)
    }

    pub fn is_escape(&self) -> bool {
        self.is_key("escape")
    }

    /// The digit carried by a single-digit key or text event.
    pub fn digit(&self) -> Option<u8> {
        let value = match self {
            Self::Key { key_id, .. } => key_id.as_str(),
            Self::Text { text, .. } => text.as_str(),
            _ => return None,
        };
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.to_digit(10).map(|digit| digit as u8),
            _ => None,
        }
    }

    /// Whether this came from the keyboard. Pointer, layout and synthetic events do not.
    pub fn is_keystroke(&self) -> bool {
        matches!(
            self,
            Self::Key { .. } | Self::Text { .. } | Self::Paste { .. } | Self::UnknownRaw { .. }
        )
    }

    /// The key an `alt+<key>` chord carries, i.e. what followed a bare ESC in the same read.
    pub fn alt_chord(&self) -> Option<&str> {
        match self {
            Self::Key { key_id, .. } => key_id.strip_prefix("alt+"),
            _ => None,
        }
    }
}

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";
const SGR_MOUSE_PREFIX: &str = "\x1b[<";

/// Splits one chunk of terminal input into events.
pub fn parse_input_events(data: &str) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut text_run = String::new();
    let mut idx = 0;

    while idx < data.len() {
        let rest = &data[idx..];

        if let Some(after) = rest.strip_prefix(PASTE_START) {
            flush_text(&mut text_run, &mut events);
            let Some(end) = after.find(PASTE_END) else {
                events.push(InputEvent::UnknownRaw {
                    raw: rest.to_string(),
                });
                break;
            };
            events.push(InputEvent::Paste {
                text: after[..end].to_string(),
            });
            idx += PASTE_START.len() + end + PASTE_END.len();
            continue;
        }

        if rest.starts_with(SGR_MOUSE_PREFIX) {
            flush_text(&mut text_run, &mut events);
            let len = match scan_escape(data, idx) {
                EscapeScan::Complete(code) => code.length,
                _ => rest.len(),
            };
            let raw = &rest[..len];
            match parse_sgr_mouse(raw) {
                Some(mouse) => events.push(InputEvent::Mouse(mouse)),
                None => events.push(InputEvent::UnknownRaw {
                    raw: raw.to_string(),
                }),
            }
            idx += len;
            continue;
        }

        if rest.starts_with('\x1b') {
            flush_text(&mut text_run, &mut events);
            let len = escape_key_len(data, idx);
            let raw = &rest[..len];
            match parse_key(raw) {
                Some(key_id) => events.push(InputEvent::Key {
                    raw: raw.to_string(),
                    key_id,
                }),
                None => events.push(InputEvent::UnknownRaw {
                    raw: raw.to_string(),
                }),
            }
            idx += len;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        let raw = &rest[..ch.len_utf8()];
        if is_printable(raw) && ch != ' ' {
            text_run.push(ch);
        } else {
            flush_text(&mut text_run, &mut events);
            match parse_key(raw) {
                Some(key_id) => events.push(InputEvent::Key {
                    raw: raw.to_string(),
                    key_id,
                }),
                None => events.push(InputEvent::UnknownRaw {
                    raw: raw.to_string(),
                }),
            }
        }
        idx += ch.len_utf8();
    }

    flush_text(&mut text_run, &mut events);
    events
}

fn flush_text(run: &mut String, events: &mut Vec<InputEvent>) {
    if run.is_empty() {
        return;
    }
    let text = std::mem::take(run);
    // A lone character doubles as a key so bindings like `q` or `2` match it.
    if text.chars().count() == 1 {
        events.push(InputEvent::Key {
            raw: text.clone(),
            key_id: text,
        });
    } else {
        events.push(InputEvent::Text {
            raw: text.clone(),
            text,
        });
    }
}

fn escape_key_len(data: &str, idx: usize) -> usize {
    match scan_escape(data, idx) {
        EscapeScan::Complete(code) => code.length,
        EscapeScan::Truncated => data.len() - idx,
        EscapeScan::Text => 0,
        EscapeScan::Bare => {
            // ESC followed by a plain character is an alt chord; a second ESC starts a new key.
            match data[idx + 1..].chars().next() {
                Some(ch) if ch != '\x1b' && !ch.is_control() => 1 + ch.len_utf8(),
                _ => 1,
            }
        }
    }
}

fn parse_sgr_mouse(raw: &str) -> Option<MouseEvent> {
    let body = raw.strip_prefix(SGR_MOUSE_PREFIX)?;
    let (params, pressed) = if let Some(params) = body.strip_suffix('M') {
        (params, true)
    } else {
        (body.strip_suffix('m')?, false)
    };

    let mut parts = params.split(';').map(|part| part.parse::<i32>().ok());
    let code = parts.next()??;
    let column = parts.next()??;
    let row = parts.next()??;
    if parts.next().is_some() {
        return None;
    }

    let button = match code & 0b11 {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    };
    let kind = if code & 64 != 0 {
        if code & 1 == 0 {
            MouseKind::ScrollUp
        } else {
            MouseKind::ScrollDown
        }
    } else if code & 32 != 0 {
        match button {
            Some(button) => MouseKind::Drag(button),
            None => MouseKind::Move,
        }
    } else {
        let button = button?;
        if pressed {
            MouseKind::Press(button)
        } else {
            MouseKind::Release(button)
        }
    };

    Some(MouseEvent {
        column: column - 1,
        row: row - 1,
        kind,
    })
}
