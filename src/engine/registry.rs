//! Node registries - key, name and z-index lookup tables.
//!
//! Three independent indices kept in lock-step with node lifecycle:
//! - Key index: every live key and its kind
//! - Name index: name → nodes sharing it, insertion ordered, deduplicated
//! - Layers: z-index → nodes currently at that weight, insertion ordered
//!
//! Each table is a `DashMap`, so the size poller, the keystroke reader and
//! application threads can all read and write without outside locking.

use dashmap::DashMap;

use crate::types::{NodeAttr, NodeKey, NodeKind};

#[derive(Debug, Default)]
pub(crate) struct Registry {
    keys: DashMap<NodeKey, NodeKind>,
    names: DashMap<String, Vec<NodeKey>>,
    layers: DashMap<u32, Vec<NodeKey>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Add a freshly created node to all three indices.
    pub(crate) fn register(&self, attr: &NodeAttr, z_index: u32) {
        self.keys.insert(attr.key, attr.kind);
        push_unique(&self.names, attr.name.clone(), attr.key);
        push_unique(&self.layers, z_index, attr.key);
    }

    /// Drop a node from all three indices.
    pub(crate) fn unregister(&self, key: NodeKey, name: &str, z_index: u32) {
        self.keys.remove(&key);
        splice_out(&self.names, name, key);
        splice_out(&self.layers, &z_index, key);
    }

    /// Move a node between layers after its z-index changed.
    pub(crate) fn move_layer(&self, key: NodeKey, from: u32, to: u32) {
        if from == to {
            return;
        }
        splice_out(&self.layers, &from, key);
        push_unique(&self.layers, to, key);
    }

    /// Empty every index.
    pub(crate) fn clear(&self) {
        self.keys.clear();
        self.names.clear();
        self.layers.clear();
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub(crate) fn contains(&self, key: &NodeKey) -> bool {
        self.keys.contains_key(key)
    }

    pub(crate) fn by_name(&self, name: &str) -> Vec<NodeKey> {
        self.names
            .get(name)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub(crate) fn layer(&self, z_index: u32) -> Vec<NodeKey> {
        self.layers
            .get(&z_index)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}

fn push_unique<K>(map: &DashMap<K, Vec<NodeKey>>, group: K, key: NodeKey)
where
    K: std::hash::Hash + Eq,
{
    let mut entry = map.entry(group).or_default();
    if !entry.contains(&key) {
        entry.push(key);
    }
}

fn splice_out<K, Q>(map: &DashMap<K, Vec<NodeKey>>, group: &Q, key: NodeKey)
where
    K: std::hash::Hash + Eq + std::borrow::Borrow<Q>,
    Q: std::hash::Hash + Eq + ?Sized,
{
    let emptied = match map.get_mut(group) {
        Some(mut entry) => {
            if let Some(index) = entry.iter().position(|k| *k == key) {
                entry.remove(index);
            }
            entry.is_empty()
        }
        None => false,
    };
    if emptied {
        map.remove_if(group, |_, nodes| nodes.is_empty());
    }
}
