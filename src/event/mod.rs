//! Event system - per-node callback slots and the cascades that drive them.
//!
//! - [`bus`]: slot table, registration and lookup
//! - [`propagation`]: show/hide and layout cascades down the tree

mod bus;
pub(crate) mod propagation;

pub use bus::{Callback, ListenerId};
pub(crate) use bus::EventBus;
