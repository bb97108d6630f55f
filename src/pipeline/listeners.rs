//! Background listeners - window-size poller and keystroke reader.
//!
//! Both are plain threads holding a weak reference to the engine. They feed it
//! through the same paths application code uses: the poller calls `resize`,
//! the reader hands each keystroke to the focus controller. Failing to query
//! the terminal or to open the keystroke source is fatal.
//!
//! The sources are traits so the threads can be driven without a terminal.

use std::io;
use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

use super::terminal::fatal;
use crate::engine::Shared;
use crate::state::{KeyboardEvent, focus};

// =============================================================================
// Sources
// =============================================================================

/// Something that reports the terminal size.
pub trait SizeSource: Send + 'static {
    /// Current `(width, height)` in cells.
    fn size(&mut self) -> io::Result<(i32, i32)>;
}

/// Something that yields keystrokes, one blocking read at a time.
pub trait KeySource: Send + 'static {
    /// Prepare the source. Called once, on the reader thread.
    fn open(&mut self) -> io::Result<()>;

    /// Block until the next keystroke.
    fn read_key(&mut self) -> io::Result<KeyboardEvent>;
}

/// Terminal size through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermSize;

impl SizeSource for CrosstermSize {
    fn size(&mut self) -> io::Result<(i32, i32)> {
        let (width, height) = terminal::size()?;
        Ok((i32::from(width), i32::from(height)))
    }
}

/// Keystrokes through crossterm, with the terminal in raw mode while open.
#[derive(Debug, Default)]
pub struct CrosstermKeys {
    raw: bool,
}

impl CrosstermKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for CrosstermKeys {
    fn open(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw = true;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<KeyboardEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    return Ok(key.into());
                }
            }
        }
    }
}

impl Drop for CrosstermKeys {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

// =============================================================================
// Threads
// =============================================================================

/// Poll `source` every `interval` and feed changes to the engine.
pub(crate) fn spawn_size_poller<S: SizeSource>(
    shared: Weak<Shared>,
    mut source: S,
    interval: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tml-size".to_string())
        .spawn(move || {
            loop {
                let (width, height) = match source.size() {
                    Ok(size) => size,
                    Err(err) => fatal("failed to query the terminal size", &err),
                };
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.resize(width, height);
                drop(shared);
                thread::sleep(interval);
            }
            tracing::debug!("size poller stopped");
        })
}

/// Read keystrokes from `source` and dispatch them to the focused node.
pub(crate) fn spawn_key_reader<K: KeySource>(
    shared: Weak<Shared>,
    mut source: K,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tml-keys".to_string())
        .spawn(move || {
            if let Err(err) = source.open() {
                fatal("failed to open the keystroke source", &err);
            }
            loop {
                let event = match source.read_key() {
                    Ok(event) => event,
                    Err(err) => fatal("failed to read a keystroke", &err),
                };
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                tracing::trace!(key = %event.key, "keystroke");
                focus::dispatch(&shared, event);
            }
            tracing::debug!("key reader stopped");
        })
}
