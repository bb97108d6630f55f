//! Terminal renderer.
//!
//! A paint pass walks the tree from the root, depth first, picking each
//! level's children in ascending z-index. Every node is handed to the
//! compositor for its kind; a node that fails to draw (hidden, unsized,
//! removed, off its parent's box) takes its whole subtree with it.
//!
//! The whole frame is built in an [`OutputBuffer`] and written to the sink in
//! one go. There is no diffing against the previous frame.

pub mod ansi;
mod compositor;
pub mod output;
mod painting;

pub use output::OutputBuffer;

use std::io::{self, Write};

use crate::engine::Tree;
use crate::pipeline::terminal::ScreenSize;
use crate::types::{Dimension, NodeKey, NodeKind};
use painting::PaintingOrder;

// =============================================================================
// Painter
// =============================================================================

/// Frame buffer plus the sink frames are flushed to.
pub(crate) struct Painter {
    buffer: OutputBuffer,
    sink: Box<dyn Write + Send>,
    frames: u64,
}

impl Painter {
    pub(crate) fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            buffer: OutputBuffer::new(),
            sink,
            frames: 0,
        }
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut OutputBuffer {
        &mut self.buffer
    }

    /// Write the buffered frame to the sink. Returns the bytes written.
    pub(crate) fn flush(&mut self) -> io::Result<Vec<u8>> {
        let frame = self.buffer.as_bytes().to_vec();
        if self.buffer.flush_to(&mut *self.sink)? > 0 {
            self.frames += 1;
        }
        Ok(frame)
    }

    /// Frames written so far.
    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }
}

// =============================================================================
// Tree Walk
// =============================================================================

/// Reset `out` and paint the tree under `root` into it.
pub(crate) fn paint_tree(
    tree: &mut Tree,
    root: NodeKey,
    screen: ScreenSize,
    out: &mut OutputBuffer,
) -> io::Result<()> {
    out.clear();
    element_loop(tree, root, screen, out)
}

fn element_loop(
    tree: &mut Tree,
    key: NodeKey,
    screen: ScreenSize,
    out: &mut OutputBuffer,
) -> io::Result<()> {
    if !render_node(tree, key, screen, out)? {
        return Ok(());
    }

    let children: Vec<(NodeKey, u32)> = match tree.get(&key) {
        Some(node) => node
            .children
            .iter()
            .filter_map(|child| tree.get(child).map(|c| (*child, c.position.z_index)))
            .collect(),
        None => return Ok(()),
    };
    for child in PaintingOrder::seed(children) {
        element_loop(tree, child, screen, out)?;
    }
    Ok(())
}

/// Paint one node. False means its subtree is skipped.
fn render_node(
    tree: &mut Tree,
    key: NodeKey,
    screen: ScreenSize,
    out: &mut OutputBuffer,
) -> io::Result<bool> {
    if !screen.is_renderable() {
        return Ok(false);
    }
    let Ok(node) = tree.live(&key) else {
        return Ok(false);
    };

    let sized = node.style.auto_size
        || matches!(
            (node.volume.width, node.volume.height),
            (Dimension::Cells(w), Dimension::Cells(h)) if w > 0 && h > 0
        );
    if !node.style.display || !sized {
        return Ok(false);
    }

    let kind = node.attr.kind;
    match kind {
        NodeKind::Quadrilateral => compositor::draw_quadrilateral(tree, key, screen, out),
    }
}
