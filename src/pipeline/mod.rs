//! Pipeline - everything that runs off the caller's thread.
//!
//! ```text
//! size poller ──resize──┐
//!                       ├──► Shared (tree, registries, bus) ──request──► scheduler ──paint──► sink
//! key reader ──dispatch─┘
//! ```
//!
//! - [`terminal`]: screen size state and fatal environment errors
//! - [`scheduler`]: debounced paint thread
//! - [`listeners`]: window-size poller and keystroke reader

pub mod listeners;
pub(crate) mod scheduler;
pub mod terminal;

pub use listeners::{CrosstermKeys, CrosstermSize, KeySource, SizeSource};
pub use terminal::ScreenSize;
