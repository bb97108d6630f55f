//! Node arena.
//!
//! Nodes live in one map addressed by [`NodeKey`]. Children are an ordered
//! list of keys and the parent link is a plain key lookup, so there is no
//! ownership edge pointing upward.
//!
//! Removed nodes leave the arena. Only their parent link survives, and only
//! while it lies on the focus chain: rollback climbs from a removed focus
//! through removed ancestors to the nearest mounted one.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::state::KeyboardEvent;
use crate::types::{NodeAttr, NodeKey, NodeKind, Position, Style, Volume};

/// Stored state of one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) attr: NodeAttr,
    pub(crate) position: Position,
    /// Screen-space origin written by the last paint pass.
    pub(crate) absolute: (i32, i32),
    pub(crate) volume: Volume,
    pub(crate) style: Style,
    pub(crate) text: String,
    pub(crate) props: HashMap<String, String>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) last_key: Option<KeyboardEvent>,
}

impl NodeData {
    pub(crate) fn new(key: NodeKey, kind: NodeKind, name: &str) -> Self {
        Self {
            attr: NodeAttr {
                name: name.to_string(),
                kind,
                key,
            },
            position: Position::default(),
            absolute: (0, 0),
            volume: Volume::default(),
            style: Style::default(),
            text: String::new(),
            props: HashMap::new(),
            parent: None,
            children: Vec::new(),
            last_key: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    nodes: HashMap<NodeKey, NodeData>,
    /// Parent links of removed nodes still reachable from the focus.
    removed: HashMap<NodeKey, Option<NodeKey>>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, data: NodeData) {
        self.nodes.insert(data.attr.key, data);
    }

    /// Mounted nodes held by the arena.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, key: &NodeKey) -> Option<&NodeData> {
        self.nodes.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &NodeKey) -> Option<&mut NodeData> {
        self.nodes.get_mut(key)
    }

    /// A node that is still mounted.
    pub(crate) fn live(&self, key: &NodeKey) -> Result<&NodeData> {
        self.nodes.get(key).ok_or(Error::Unmounted)
    }

    pub(crate) fn live_mut(&mut self, key: &NodeKey) -> Result<&mut NodeData> {
        self.nodes.get_mut(key).ok_or(Error::Unmounted)
    }

    pub(crate) fn is_unmounted(&self, key: &NodeKey) -> bool {
        !self.nodes.contains_key(key)
    }

    /// Parent of a mounted node, or the remembered parent of a removed one.
    pub(crate) fn parent_of(&self, key: &NodeKey) -> Option<NodeKey> {
        match self.nodes.get(key) {
            Some(node) => node.parent,
            None => self.removed.get(key).copied().flatten(),
        }
    }

    /// True if `ancestor` is `node` or sits above it.
    pub(crate) fn is_ancestor(&self, ancestor: &NodeKey, node: &NodeKey) -> bool {
        let mut current = Some(*node);
        while let Some(key) = current {
            if key == *ancestor {
                return true;
            }
            current = self.nodes.get(&key).and_then(|n| n.parent);
        }
        false
    }

    /// `key` and every descendant, pre-order.
    pub(crate) fn subtree(&self, key: &NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![*key];
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Drop `keys` from the arena, then forget every removed parent link that
    /// is not on the chain climbing from `focus`.
    pub(crate) fn bury(&mut self, keys: &[NodeKey], focus: Option<NodeKey>) {
        for key in keys {
            if let Some(node) = self.nodes.remove(key) {
                self.removed.insert(*key, node.parent);
            }
        }

        let mut chain = HashMap::new();
        let mut current = focus;
        while let Some(key) = current {
            let Some(parent) = self.removed.remove(&key) else {
                break;
            };
            chain.insert(key, parent);
            current = parent;
        }
        self.removed = chain;
    }

    /// Drop every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.removed.clear();
    }
}
