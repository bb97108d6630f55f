//! # tml-core
//!
//! Retained-mode terminal UI engine.
//!
//! ## Architecture
//!
//! Application code builds a tree of rectangular nodes and edits it through
//! [`Node`] handles. Every edit fires its notifications synchronously and asks
//! for a render; the render scheduler coalesces bursts of requests into one
//! paint pass, which walks the tree and writes a single VT100 frame.
//!
//! ```text
//! Node setters ──► notifications (sync) ──► render request ──debounce──► paint ──► terminal
//!      ▲
//!      ├── size poller (resize cascade)
//!      └── key reader (focused node, rollback on failure)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Node identity, volume, position, style and event kinds
//! - [`engine`] - Engine context, node arena, registries, node handles
//! - [`event`] - Per-node listener slots and tree-wide cascades
//! - [`renderer`] - Paint walk, VT100 compositor, ANSI codes
//! - [`pipeline`] - Render scheduler and background listeners
//! - [`state`] - Focus and keyboard input

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

pub use config::EngineConfig;
pub use engine::{Engine, Node};
pub use error::{Error, Result};
pub use event::{Callback, ListenerId};
pub use pipeline::{CrosstermKeys, CrosstermSize, KeySource, ScreenSize, SizeSource};
pub use renderer::ansi;
pub use state::{KeyboardEvent, Modifiers};
pub use types::*;
