//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once};
use std::thread;
use std::time::{Duration, Instant};

use tml_core::{Engine, EngineConfig, EventKind, Node, NodeKey};

// =============================================================================
// CAPTURED SINK
// =============================================================================

/// Sink that keeps every frame written to it.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// ENGINES
// =============================================================================

/// Engine whose background painter effectively never fires.
pub fn engine() -> Engine {
    engine_with(quiet_config()).0
}

pub fn quiet_config() -> EngineConfig {
    EngineConfig::default().with_render_debounce(Duration::from_secs(60))
}

/// Route engine logs through the test harness. Filter with RUST_LOG.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn engine_with(config: EngineConfig) -> (Engine, Capture) {
    init_tracing();
    let capture = Capture::default();
    let engine = Engine::with_output(config, Box::new(capture.clone())).unwrap();
    (engine, capture)
}

// =============================================================================
// EVENT RECORDING
// =============================================================================

/// `(kind, target, origin)` in firing order.
pub type Log = Arc<Mutex<Vec<(EventKind, NodeKey, NodeKey)>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Record every `kind` notification delivered to `node`.
pub fn record(log: &Log, node: &Node, kinds: &[EventKind]) {
    for &kind in kinds {
        let log = log.clone();
        node.add_event_listener(kind, move |target, origin| {
            log.lock().unwrap().push((kind, target.key(), origin.key()));
        })
        .unwrap();
    }
}

pub fn entries(log: &Log) -> Vec<(EventKind, NodeKey, NodeKey)> {
    log.lock().unwrap().clone()
}

// =============================================================================
// TIMING
// =============================================================================

/// Poll `cond` until it holds or `timeout` runs out.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}
