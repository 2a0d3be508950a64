//! Modal dialogs for string-rendered terminal UIs.
//!
//! Invariant: only the topmost dialog on a [`DialogStack`] sees input, and a
//! dialog is shown exactly when its name is on the stack.
//!
//! # Public API Overview
//! - Implement [`Content`] (plus any of [`FooterHints`], [`ThemeRequest`],
//!   [`Sizable`]) for the body of a dialog.
//! - Wrap it in a [`Dialog`], full screen or [`Dialog::windowed`] over a backdrop.
//! - Register dialogs on a [`DialogStack`] and drive it with a [`Host`], which
//!   owns the single event stream and applies returned [`Command`]s.
//! - Use [`slice_columns`] and the width helpers for ANSI-safe column work.

#![allow(clippy::type_complexity)]

pub mod config;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;

/// Content contract and optional capabilities.
pub use crate::core::component::{Capabilities, Content, FooterHints, KeyHint, Sizable, ThemeRequest};
/// Side effects returned from updates.
pub use crate::core::command::Command;
/// Input parsing and events.
pub use crate::core::input::{matches_key, parse_key};
pub use crate::core::input_event::{parse_input_events, InputEvent, MouseButton, MouseEvent, MouseKind};

/// Dialog runtime.
pub use crate::runtime::{
    Clock, Dialog, DialogLayout, DialogStack, DialogTiming, DialogUpdate, EscapeSequencer,
    EventQueue, Host, Registered, SequencerAction, SequencerState, StackError, SystemClock,
};

/// Configuration and logging setup.
pub use crate::config::{ConfigError, EnvConfig};
pub use crate::logging::LoggingError;

/// ANSI-aware column slicing.
pub use crate::core::text::slice::{slice_columns, slice_with_width, SliceResult};
/// ANSI-aware truncation helper.
pub use crate::core::text::utils::truncate_to_width;
/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::width::visible_width;
