//! Painting order - siblings in ascending z-index.
//!
//! Seeded once per parent with its children and drained one at a time. The
//! sort is stable, so siblings sharing a z-index keep their insertion order.
//! Every level of the render walk seeds its own order.

use std::vec;

use crate::types::NodeKey;

#[derive(Debug)]
pub(crate) struct PaintingOrder {
    queue: vec::IntoIter<(NodeKey, u32)>,
}

impl PaintingOrder {
    /// Seed with `(key, z_index)` pairs in insertion order.
    pub(crate) fn seed(children: impl IntoIterator<Item = (NodeKey, u32)>) -> Self {
        let mut children: Vec<_> = children.into_iter().collect();
        children.sort_by_key(|&(_, z_index)| z_index);
        Self {
            queue: children.into_iter(),
        }
    }
}

impl Iterator for PaintingOrder {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        self.queue.next().map(|(key, _)| key)
    }
}
