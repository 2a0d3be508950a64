//! Rendering helpers: dialog chrome and window compositing.

pub mod chrome;
pub mod overlay;

pub use chrome::{BorderGlyphs, DOUBLE, ROUNDED};
pub use overlay::{composite_window, window_placement, WindowPlacement};
