//! Terminal state.
//!
//! The engine only knows the screen through the last size the poller reported.
//! Until the first report the size is `0x0`, which is not renderable: render
//! requests are dropped and every paint pass draws nothing.

use std::sync::{Mutex, PoisonError};

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Both sides positive.
    pub const fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Default)]
pub(crate) struct Screen(Mutex<ScreenSize>);

impl Screen {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn size(&self) -> ScreenSize {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new size. Returns false if it equals the current one.
    pub(crate) fn set(&self, size: ScreenSize) -> bool {
        let mut current = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == size {
            return false;
        }
        *current = size;
        true
    }
}

/// Abort on an environment failure (terminal query, keystroke source).
///
/// Raw mode is switched off first so the shell is usable afterwards.
pub(crate) fn fatal(context: &str, err: &dyn std::error::Error) -> ! {
    tracing::error!(%err, "{context}");
    let _ = crossterm::terminal::disable_raw_mode();
    eprintln!("[tml] {context}: {err}");
    std::process::exit(1)
}
