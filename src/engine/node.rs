//! Node handle - the capability surface application code works through.
//!
//! A [`Node`] is a key plus a reference to the engine that owns it. Every
//! method checks that the node is still mounted and fails with
//! [`Error::Unmounted`] once it has been removed.
//!
//! Setters compare against the stored value and return early when nothing
//! changed: no notification, no render request. A real change stores the new
//! value, fires the matching notifications and schedules one render.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{Engine, Shared};
use crate::error::{Error, Result};
use crate::event::{ListenerId, propagation};
use crate::state::KeyboardEvent;
use crate::types::{EventKind, NodeAttr, NodeKey, Position, PositionType, Style, Volume};

#[derive(Clone)]
pub struct Node {
    key: NodeKey,
    shared: Arc<Shared>,
}

impl Node {
    pub(crate) fn new(key: NodeKey, shared: Arc<Shared>) -> Self {
        Self { key, shared }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// True once the node has been removed.
    pub fn is_unmounted(&self) -> bool {
        self.shared.tree().is_unmounted(&self.key)
    }

    /// The engine this node belongs to.
    pub fn engine(&self) -> Engine {
        Engine::from_shared(self.shared.clone())
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Append children, in order.
    ///
    /// A child that already has a parent is detached from it first. Inserting
    /// a node under itself or one of its descendants fails with
    /// [`Error::InsertCycle`], inserting the root fails with
    /// [`Error::InsertRoot`]; either way nothing changes.
    pub fn insert<'a>(&self, children: impl IntoIterator<Item = &'a Node>) -> Result<()> {
        let children: Vec<NodeKey> = children.into_iter().map(|child| child.key).collect();
        let mut transitions = Vec::new();
        {
            let mut tree = self.shared.tree();
            let display = tree.live(&self.key)?.style.display;
            for child in &children {
                tree.live(child)?;
                if *child == self.shared.root {
                    return Err(Error::InsertRoot);
                }
                if tree.is_ancestor(child, &self.key) {
                    return Err(Error::InsertCycle);
                }
            }

            for child in &children {
                let old_parent = tree.live(child)?.parent;
                let mut old_display = None;
                if let Some(old_parent) = old_parent {
                    if let Some(old) = tree.get_mut(&old_parent) {
                        old.children.retain(|k| k != child);
                        old_display = Some(old.style.display);
                    }
                }
                tree.live_mut(child)?.parent = Some(self.key);
                tree.live_mut(&self.key)?.children.push(*child);

                match old_display {
                    Some(old) if old != display => transitions.push((*child, display)),
                    None if display => transitions.push((*child, true)),
                    _ => {}
                }
            }
        }

        for (child, display) in transitions {
            propagation::display_cascade(&self.shared, child, self.key, display);
        }
        self.shared.request_render();
        Ok(())
    }

    pub fn parent(&self) -> Result<Option<Node>> {
        let parent = self.shared.tree().live(&self.key)?.parent;
        Ok(parent.map(|key| self.shared.node(key)))
    }

    pub fn children(&self) -> Result<Vec<Node>> {
        let children = self.shared.tree().live(&self.key)?.children.clone();
        Ok(children.into_iter().map(|key| self.shared.node(key)).collect())
    }

    /// Remove `child` if it is one of this node's children.
    ///
    /// A child that is still mounted is removed entirely (subtree included);
    /// an already removed one is only spliced out of the list.
    pub fn remove_child(&self, child: &Node) -> Result<()> {
        let already_unmounted = {
            let mut tree = self.shared.tree();
            let child_unmounted = tree.is_unmounted(&child.key);
            let node = tree.live_mut(&self.key)?;
            if !node.children.contains(&child.key) {
                return Ok(());
            }
            if child_unmounted {
                node.children.retain(|k| *k != child.key);
            }
            child_unmounted
        };

        if already_unmounted {
            self.shared.request_render();
            Ok(())
        } else {
            self.shared.remove(child.key)
        }
    }

    /// Remove this node and its subtree from the engine.
    pub fn remove(&self) -> Result<()> {
        self.shared.remove(self.key)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attr(&self) -> Result<NodeAttr> {
        Ok(self.shared.tree().live(&self.key)?.attr.clone())
    }

    pub fn volume(&self) -> Result<Volume> {
        Ok(self.shared.tree().live(&self.key)?.volume)
    }

    pub fn set_volume(&self, volume: Volume) -> Result<()> {
        let children = {
            let mut tree = self.shared.tree();
            let node = tree.live_mut(&self.key)?;
            if node.volume == volume {
                return Ok(());
            }
            node.volume = volume;
            node.children.clone()
        };

        self.shared.trigger(self.key, EventKind::SizeChanged, self.key);
        for child in children {
            propagation::layout_cascade(&self.shared, child, self.key, true);
        }
        self.shared.request_render();
        Ok(())
    }

    pub fn position(&self) -> Result<Position> {
        Ok(self.shared.tree().live(&self.key)?.position)
    }

    /// Screen-space origin resolved by the last paint pass.
    pub fn absolute_origin(&self) -> Result<(i32, i32)> {
        Ok(self.shared.tree().live(&self.key)?.absolute)
    }

    pub fn set_position(&self, position: Position) -> Result<()> {
        self.set_position_as(position, position.kind)
    }

    /// Set the position, overriding its placement rules with `kind`.
    pub fn set_position_as(&self, position: Position, kind: PositionType) -> Result<()> {
        let next = Position { kind, ..position };
        let (moved, children) = {
            let mut tree = self.shared.tree();
            let node = tree.live_mut(&self.key)?;
            let previous = node.position;
            if previous == next {
                return Ok(());
            }
            node.position = next;
            let children = node.children.clone();
            self.shared
                .registry
                .move_layer(self.key, previous.z_index, next.z_index);
            (previous.x != next.x || previous.y != next.y, children)
        };

        if moved {
            self.shared.trigger(self.key, EventKind::Moved, self.key);
            for child in children {
                propagation::layout_cascade(&self.shared, child, self.key, true);
            }
        }
        self.shared.request_render();
        Ok(())
    }

    pub fn style(&self) -> Result<Style> {
        Ok(self.shared.tree().live(&self.key)?.style)
    }

    /// Replace the style.
    ///
    /// A display flip runs the show/hide cascade before the new style is
    /// stored, so it only fires when the node is currently displayed.
    pub fn set_style(&self, style: Style) -> Result<()> {
        let displayed = {
            let tree = self.shared.tree();
            let node = tree.live(&self.key)?;
            if node.style == style {
                return Ok(());
            }
            node.style.display
        };

        if displayed != style.display {
            propagation::display_cascade(&self.shared, self.key, self.key, style.display);
        }
        self.shared.tree().live_mut(&self.key)?.style = style;
        self.shared.request_render();
        Ok(())
    }

    pub fn text(&self) -> Result<String> {
        Ok(self.shared.tree().live(&self.key)?.text.clone())
    }

    /// Replace the text. Fires `Input` only when the content differs.
    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        {
            let mut tree = self.shared.tree();
            let node = tree.live_mut(&self.key)?;
            if node.text == text {
                return Ok(());
            }
            node.text = text;
        }

        self.shared.trigger(self.key, EventKind::Input, self.key);
        self.shared.request_render();
        Ok(())
    }

    pub fn props(&self) -> Result<HashMap<String, String>> {
        Ok(self.shared.tree().live(&self.key)?.props.clone())
    }

    pub fn prop(&self, key: &str) -> Result<Option<String>> {
        Ok(self.shared.tree().live(&self.key)?.props.get(key).cloned())
    }

    pub fn set_prop(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let (key, value) = (key.into(), value.into());
        {
            let mut tree = self.shared.tree();
            let node = tree.live_mut(&self.key)?;
            if node.props.get(&key) == Some(&value) {
                return Ok(());
            }
            node.props.insert(key, value);
        }
        self.shared.request_render();
        Ok(())
    }

    /// Last keystroke delivered while this node held focus.
    ///
    /// Only meaningful inside a `KeyPressed` callback.
    pub fn keyboard_event(&self) -> Result<Option<KeyboardEvent>> {
        Ok(self.shared.tree().live(&self.key)?.last_key.clone())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register `callback` for `kind`. It runs with `(target, origin)`.
    pub fn add_event_listener<F>(&self, kind: EventKind, callback: F) -> Result<ListenerId>
    where
        F: Fn(&Node, &Node) + Send + Sync + 'static,
    {
        self.shared.tree().live(&self.key)?;
        self.shared
            .events
            .add(&self.key, kind, Arc::new(callback))
            .ok_or(Error::Unmounted)
    }

    /// Unregister a callback. Returns false if the handle was not registered.
    pub fn remove_event_listener(&self, kind: EventKind, id: ListenerId) -> Result<bool> {
        self.shared.tree().live(&self.key)?;
        Ok(self.shared.events.remove(&self.key, kind, id))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.key).finish()
    }
}
