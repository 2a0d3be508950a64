//! Text helpers (escape scanning, width calculations, column slicing, fitting).
//!
//! These helpers are pure (string in/string out) and live under `core` so content
//! implementations can depend on them without importing the render layer.

pub mod ansi;
pub mod slice;
pub mod utils;
pub mod width;
