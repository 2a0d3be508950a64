//! Dialog content contract and its optional capabilities.

use crate::core::command::Command;
use crate::core::input_event::InputEvent;

/// A `(key, label)` pair shown in a dialog footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: String,
    pub label: String,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Body of a dialog.
///
/// The three required methods are all a dialog needs. Everything else is an
/// opt-in capability exposed through the `as_*` accessors, which return `None`
/// unless the content implements the matching trait.
pub trait Content {
    /// One-shot side effect run when the dialog is opened.
    fn init(&mut self) -> Command {
        Command::None
    }

    /// Render into an interior of `width` x `height` cells.
    ///
    /// Lines may be shorter or longer than `width`; the dialog pads and clips.
    fn render(&mut self, width: usize, height: usize) -> String;

    /// React to an input event. Pointer coordinates are already content-relative.
    fn handle_event(&mut self, _event: &InputEvent) -> Command {
        Command::None
    }

    fn as_footer_hints(&self) -> Option<&dyn FooterHints> {
        None
    }

    fn as_theme_request(&mut self) -> Option<&mut dyn ThemeRequest> {
        None
    }

    fn as_sizable(&mut self) -> Option<&mut dyn Sizable> {
        None
    }

    /// Viewer content is drawn borderless and full width.
    fn is_viewer(&self) -> bool {
        false
    }
}

/// Extra footer entries, appended after the built-in close hint in this order.
pub trait FooterHints {
    fn footer_hints(&self) -> Vec<KeyHint>;
}

/// Content that can ask the host for a theme change (`Esc` then `2`).
pub trait ThemeRequest {
    fn request_theme(&mut self) -> Command;
}

/// Content that wants its interior size pushed to it before every render.
pub trait Sizable {
    fn set_dimensions(&mut self, width: usize, height: usize);
}

/// Capability snapshot taken once when content is attached to a dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub footer_hints: bool,
    pub theme: bool,
    pub sizable: bool,
    pub viewer: bool,
}

impl Capabilities {
    pub fn detect(content: &mut dyn Content) -> Self {
        Self {
            footer_hints: content.as_footer_hints().is_some(),
            theme: content.as_theme_request().is_some(),
            sizable: content.as_sizable().is_some(),
            viewer: content.is_viewer(),
        }
    }
}
