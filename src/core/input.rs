//! Key parsing for legacy terminal input.
//!
//! Key ids are lowercase, modifier-prefixed strings (`escape`, `enter`, `ctrl+c`,
//! `shift+tab`). Printable single characters are their own id.

const LEGACY_SEQUENCES: &[(&str, &str)] = &[
    ("\x1b[A", "up"),
    ("\x1b[B", "down"),
    ("\x1b[C", "right"),
    ("\x1b[D", "left"),
    ("\x1bOA", "up"),
    ("\x1bOB", "down"),
    ("\x1bOC", "right"),
    ("\x1bOD", "left"),
    ("\x1b[H", "home"),
    ("\x1b[F", "end"),
    ("\x1bOH", "home"),
    ("\x1bOF", "end"),
    ("\x1b[1~", "home"),
    ("\x1b[4~", "end"),
    ("\x1b[2~", "insert"),
    ("\x1b[3~", "delete"),
    ("\x1b[5~", "pageUp"),
    ("\x1b[6~", "pageDown"),
    ("\x1b[Z", "shift+tab"),
    ("\x1bOM", "enter"),
];

/// Maps one complete key sequence to its key id.
pub fn parse_key(data: &str) -> Option<String> {
    if let Some((_, id)) = LEGACY_SEQUENCES.iter().find(|(seq, _)| *seq == data) {
        return Some((*id).to_string());
    }

    match data {
        "\x1b" => return Some("escape".to_string()),
        "\t" => return Some("tab".to_string()),
        "\r" | "\n" => return Some("enter".to_string()),
        " " => return Some("space".to_string()),
        "\x7f" | "\x08" => return Some("backspace".to_string()),
        "\x00" => return Some("ctrl+space".to_string()),
        _ => {}
    }

    let mut chars = data.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if rest.is_empty() {
        let code = first as u32;
        if (1..=26).contains(&code) {
            let letter = char::from(b'a' + (code - 1) as u8);
            return Some(format!("ctrl+{letter}"));
        }
        if !first.is_control() {
            return Some(first.to_string());
        }
        return None;
    }

    if first == '\x1b' {
        let mut alt = rest.chars();
        if let (Some(ch), None) = (alt.next(), alt.next()) {
            if !ch.is_control() {
                return Some(format!("alt+{ch}"));
            }
        }
    }

    None
}

/// Returns whether `data` is the given key id.
pub fn matches_key(data: &str, key_id: &str) -> bool {
    parse_key(data).is_some_and(|parsed| parsed.eq_ignore_ascii_case(key_id))
}

/// Whether `data` is printable text rather than a key chord.
pub fn is_printable(data: &str) -> bool {
    !data.is_empty() && !data.starts_with('\x1b') && data.chars().all(|ch| !ch.is_control())
}
