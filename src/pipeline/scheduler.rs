//! Render scheduler - coalesces bursts of render requests into one paint.
//!
//! A request is a unit message on a channel. The paint thread blocks until the
//! first one arrives, then keeps draining until the channel has been quiet for
//! the debounce interval, and only then paints. Requests that arrive while a
//! paint is running stay queued and start the next window.
//!
//! The thread holds a weak reference to the engine, so it never keeps it
//! alive. When the last engine handle goes away the sender is dropped with it
//! and the thread exits.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::Shared;

pub(crate) struct RenderScheduler {
    tx: Sender<()>,
    requests: AtomicU64,
}

impl RenderScheduler {
    pub(crate) fn new() -> (Self, Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        let scheduler = Self {
            tx,
            requests: AtomicU64::new(0),
        };
        (scheduler, rx)
    }

    /// Enqueue one request.
    pub(crate) fn request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        // The receiver only disappears when the paint thread is gone, and then
        // there is nothing left to paint.
        let _ = self.tx.send(());
    }

    pub(crate) fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

/// Spawn the paint thread.
pub(crate) fn spawn_painter(
    shared: Weak<Shared>,
    rx: Receiver<()>,
    debounce: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tml-render".to_string())
        .spawn(move || paint_loop(shared, rx, debounce))
}

fn paint_loop(shared: Weak<Shared>, rx: Receiver<()>, debounce: Duration) {
    while rx.recv().is_ok() {
        if !settle(&rx, debounce) {
            break;
        }
        let Some(shared) = shared.upgrade() else {
            break;
        };
        match shared.paint() {
            Ok(frame) => tracing::trace!(bytes = frame.len(), "frame painted"),
            Err(err) => tracing::warn!(%err, "paint pass failed"),
        }
    }
    tracing::debug!("render thread stopped");
}

/// Wait until no request arrives for `debounce`. False if the channel closed.
fn settle(rx: &Receiver<()>, debounce: Duration) -> bool {
    loop {
        match rx.recv_timeout(debounce) {
            Ok(()) => continue,
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}
