//! Focus System - selection state and keyboard routing
//!
//! One node holds the focus at a time (the root at start-up). Keystrokes go
//! to it as `KeyPressed`. When the focused node cannot take a keystroke,
//! because it was removed or nothing listens for `KeyPressed`, focus rolls
//! back to the nearest mounted ancestor:
//!
//! ```text
//! focused C ──(not handled)──► parent P mounted?   ── yes ──► Selected(P, origin C), focus = P
//!                                     │
//!                                     no ──► continue from P
//! no parent and focus != root ──────────────────────────────► focus = root (silent)
//! ```

use std::sync::Arc;

use super::keyboard::KeyboardEvent;
use crate::engine::Shared;
use crate::types::{EventKind, NodeKey};

// =============================================================================
// SELECTION
// =============================================================================

/// Focus `node` and fire `Selected` on it, origin = the previous focus.
///
/// The node losing focus is not notified.
pub(crate) fn select(shared: &Arc<Shared>, node: NodeKey) {
    let previous = shared.focus().replace(node);
    tracing::trace!(%node, "focus selected");
    shared.trigger(node, EventKind::Selected, previous.unwrap_or(node));
}

pub(crate) fn focused(shared: &Shared) -> Option<NodeKey> {
    *shared.focus()
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Deliver one keystroke to the focused node.
pub(crate) fn dispatch(shared: &Arc<Shared>, event: KeyboardEvent) {
    let target = focused(shared).unwrap_or(shared.root);

    let stored = match shared.tree().live_mut(&target) {
        Ok(node) => {
            node.last_key = Some(event);
            true
        }
        Err(_) => false,
    };

    if !stored || !shared.trigger(target, EventKind::KeyPressed, target) {
        tracing::debug!(%target, stored, "keystroke not handled, rolling focus back");
        rollback(shared, target);
    }
}

/// Move focus from `node` to its nearest mounted ancestor.
///
/// The root has no parent, so rolling back from it (or from a detached node)
/// lands in the parentless branch.
pub(crate) fn rollback(shared: &Arc<Shared>, node: NodeKey) {
    let mut current = node;
    loop {
        let parent = shared.tree().parent_of(&current);
        let Some(parent) = parent else {
            let mut focus = shared.focus();
            if *focus != Some(shared.root) {
                *focus = Some(shared.root);
            }
            return;
        };
        if !shared.tree().is_unmounted(&parent) {
            shared.trigger(parent, EventKind::Selected, current);
            *shared.focus() = Some(parent);
            return;
        }
        current = parent;
    }
}
