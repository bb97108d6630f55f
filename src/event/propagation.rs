//! Tree-wide notification cascades.
//!
//! Both cascades read what they need from the arena, drop the lock, fire, and
//! only then look at the children. A callback that restructures the subtree
//! is therefore seen by the rest of the walk.

use std::sync::Arc;

use crate::engine::{NodeData, Shared};
use crate::types::{EventKind, NodeKey, Position, Style};

// =============================================================================
// Display Cascade
// =============================================================================

/// Fire `Shown` or `Hidden` on `node` and every displayed descendant.
///
/// A node whose own display flag is off stops the walk: nothing fires on it or
/// below it.
pub(crate) fn display_cascade(shared: &Arc<Shared>, node: NodeKey, origin: NodeKey, display: bool) {
    let style = read(shared, node, |n| n.style).unwrap_or(Style::zeroed());
    if !style.display {
        return;
    }

    let kind = if display { EventKind::Shown } else { EventKind::Hidden };
    shared.trigger(node, kind, origin);

    for child in read(shared, node, |n| n.children.clone()).unwrap_or_default() {
        display_cascade(shared, child, origin, display);
    }
}

// =============================================================================
// Layout Cascade
// =============================================================================

/// Notify nodes whose geometry derives from their container.
///
/// Adaptive nodes get `SizeChanged`, centered nodes get `Moved`. A node that
/// is neither ends the walk on its branch. With `deep`, the walk continues
/// into the children of every notified node.
pub(crate) fn layout_cascade(shared: &Arc<Shared>, node: NodeKey, origin: NodeKey, deep: bool) {
    let (style, position) = read(shared, node, |n| (n.style, n.position))
        .unwrap_or((Style::zeroed(), Position::default()));

    let adaptive = style.auto_size;
    let centered = !position.kind.center.is_empty();
    if adaptive {
        shared.trigger(node, EventKind::SizeChanged, origin);
    }
    if centered {
        shared.trigger(node, EventKind::Moved, origin);
    }
    if !(adaptive || centered) || !deep {
        return;
    }

    for child in read(shared, node, |n| n.children.clone()).unwrap_or_default() {
        layout_cascade(shared, child, origin, deep);
    }
}

fn read<T>(shared: &Shared, key: NodeKey, f: impl FnOnce(&NodeData) -> T) -> Option<T> {
    shared.tree().live(&key).ok().map(f)
}
