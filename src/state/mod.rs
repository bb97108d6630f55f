//! State Module - focus and keyboard input
//!
//! - **Focus** - which node receives keystrokes, selection and rollback
//! - **Keyboard** - event types and crossterm conversion

pub(crate) mod focus;
mod keyboard;

pub use keyboard::{KeyboardEvent, Modifiers};
