//! Engine configuration.

use std::time::Duration;

/// Default interval between terminal size queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default quiet interval a render request waits for before painting.
pub const DEFAULT_RENDER_DEBOUNCE: Duration = Duration::from_millis(1);

/// Settings read once when the engine is built and started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How often the size poller queries the terminal.
    pub poll_interval: Duration,
    /// Requests arriving closer together than this collapse into one paint.
    pub render_debounce: Duration,
    /// Spawn the window-size poller on `start`.
    pub listen_window_size: bool,
    /// Spawn the keystroke reader on `start`.
    pub listen_keyboard: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            render_debounce: DEFAULT_RENDER_DEBOUNCE,
            listen_window_size: true,
            listen_keyboard: true,
        }
    }
}

impl EngineConfig {
    /// Poll interval; zero falls back to the default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        self
    }

    pub fn with_render_debounce(mut self, debounce: Duration) -> Self {
        self.render_debounce = debounce;
        self
    }

    pub fn with_keyboard(mut self, enabled: bool) -> Self {
        self.listen_keyboard = enabled;
        self
    }

    pub fn with_window_size(mut self, enabled: bool) -> Self {
        self.listen_window_size = enabled;
        self
    }
}
