//! Per-node event slots.
//!
//! Every node owns one slot, created with the node and dropped on removal. A
//! slot maps an [`EventKind`] to the callbacks registered for it, in
//! registration order. Registration hands back a [`ListenerId`] which is the
//! only way to unregister.
//!
//! The bus never invokes anything itself: `listeners` clones the callback list
//! out of the map so the caller can run it with no shard lock held. Callbacks
//! are free to add listeners, mutate nodes or remove them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::engine::Node;
use crate::types::{EventKind, NodeKey};

/// Listener invoked with `(target, origin)`.
pub type Callback = Arc<dyn Fn(&Node, &Node) + Send + Sync>;

/// Handle returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct EventSlot {
    listeners: HashMap<EventKind, Vec<(ListenerId, Callback)>>,
}

impl EventSlot {
    /// Callbacks for `kind`, `None` when nothing is registered.
    pub(crate) fn callbacks(&self, kind: EventKind) -> Option<Vec<Callback>> {
        self.listeners
            .get(&kind)
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
    }
}

pub(crate) struct EventBus {
    slots: DashMap<NodeKey, EventSlot>,
    next_id: AtomicU64,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create an empty slot. Returns false if one already existed.
    pub(crate) fn create_slot(&self, key: NodeKey) -> bool {
        let mut created = false;
        self.slots.entry(key).or_insert_with(|| {
            created = true;
            EventSlot::default()
        });
        created
    }

    /// Detach a node's slot from the table.
    pub(crate) fn delete_slot(&self, key: &NodeKey) -> Option<EventSlot> {
        self.slots.remove(key).map(|(_, slot)| slot)
    }

    pub(crate) fn has_slot(&self, key: &NodeKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Append a callback. `None` when the node has no slot.
    pub(crate) fn add(&self, key: &NodeKey, kind: EventKind, callback: Callback) -> Option<ListenerId> {
        let mut slot = self.slots.get_mut(key)?;
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        slot.listeners.entry(kind).or_default().push((id, callback));
        Some(id)
    }

    /// Remove one callback by handle. Empty kinds are dropped from the slot.
    pub(crate) fn remove(&self, key: &NodeKey, kind: EventKind, id: ListenerId) -> bool {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return false;
        };
        let Some(list) = slot.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener, _)| *listener != id);
        let removed = list.len() != before;
        if list.is_empty() {
            slot.listeners.remove(&kind);
        }
        removed
    }

    /// Snapshot of the callbacks for `kind` on `key`.
    ///
    /// `None` means "not handled": no slot, or nothing registered for the kind.
    pub(crate) fn listeners(&self, key: &NodeKey, kind: EventKind) -> Option<Vec<Callback>> {
        self.slots.get(key)?.callbacks(kind)
    }

    pub(crate) fn clear(&self) {
        self.slots.clear();
    }
}
