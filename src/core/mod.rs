//! Core interfaces and types: content contract, commands, input, text helpers.
//!
//! Nothing in `core` depends on the render or runtime layers.

pub mod command;
pub mod component;
pub mod input;
pub mod input_event;
pub mod text;
