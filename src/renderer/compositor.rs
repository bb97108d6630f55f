//! VT100 compositor - resolves where a node lands on screen and draws it.
//!
//! # Coordinate System
//!
//! Positions are local to the parent. The absolute origin is the local origin
//! plus the parent's absolute origin, written back to the node on every pass
//! so its children can read it:
//!
//! ```text
//! absolute = parent.absolute + (x, y)
//! ```
//!
//! Centering is box-relative: the start becomes `box/2 - size/2` without the
//! parent's origin added. Right anchoring measures from the parent box's end
//! and wins over centering on the same axis.
//!
//! # Clipping
//!
//! The drawn region is the node's box clamped to the parent's content box and
//! the screen. Border cells are decided against the unclipped box, so a
//! clipped edge loses its border instead of moving it.

use std::io;

use super::ansi;
use super::output::OutputBuffer;
use crate::engine::Tree;
use crate::pipeline::terminal::ScreenSize;
use crate::types::{Axis, Color, Dimension, NodeKey};

/// Half-open span `[start, end)` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: i32,
    end: i32,
}

impl Span {
    fn sized(start: i32, size: i32) -> Self {
        Self {
            start,
            end: start.saturating_add(size),
        }
    }
}

/// Draw a quadrilateral. Returns false when it does not land on screen.
pub(crate) fn draw_quadrilateral(
    tree: &mut Tree,
    key: NodeKey,
    screen: ScreenSize,
    out: &mut OutputBuffer,
) -> io::Result<bool> {
    let (content_w, content_h) = content_size(tree, &key, screen);
    let Some(node) = tree.get(&key) else {
        return Ok(false);
    };
    let position = node.position;
    let style = node.style;
    let parent = node.parent;

    let inherited = |size| style.auto_size.then_some(size);
    let (Some(width), Some(height)) = (
        effective(node.volume.width, inherited(content_w)),
        effective(node.volume.height, inherited(content_h)),
    ) else {
        return Ok(false);
    };

    let origin = parent
        .and_then(|p| tree.get(&p))
        .map_or((0, 0), |p| p.absolute);
    let absolute = (
        origin.0.saturating_add(position.x),
        origin.1.saturating_add(position.y),
    );
    if let Some(node) = tree.get_mut(&key) {
        node.absolute = absolute;
    }

    if parent.is_some()
        && (position.x > content_w
            || position.y > content_h
            || position.x.saturating_add(width) <= 0
            || position.y.saturating_add(height) <= 0)
    {
        return Ok(false);
    }

    // Content box of the parent, or the whole screen for the root.
    let bounds_x = Span::sized(origin.0, content_w);
    let bounds_y = Span::sized(origin.1, content_h);

    let mut x = Span::sized(absolute.0, width);
    let mut y = Span::sized(absolute.1, height);

    let center = position.kind.center;
    if center.contains(Axis::X) {
        x = Span::sized(content_w / 2 - width / 2, width);
    }
    if center.contains(Axis::Y) {
        y = Span::sized(content_h / 2 - height / 2, height);
    }

    let right = position.kind.right;
    if right.contains(Axis::X) {
        let end = bounds_x.end.saturating_sub(position.x);
        x = Span { start: end.saturating_sub(width), end };
    }
    if right.contains(Axis::Y) {
        let end = bounds_y.end.saturating_sub(position.y);
        y = Span { start: end.saturating_sub(height), end };
    }

    let clip_x = Span {
        start: clamp_start(x.start, bounds_x.start),
        end: clamp_end(x.end, bounds_x.end, screen.width),
    };
    let clip_y = Span {
        start: clamp_start(y.start, bounds_y.start),
        end: clamp_end(y.end, bounds_y.end, screen.height),
    };

    ansi::cursor_hide(out)?;
    if let Some(color) = style.text_color {
        ansi::fg(out, color)?;
    }
    if let Some(color) = style.background {
        ansi::bg(out, color)?;
    }

    let glyphs = match style.border.glyphs() {
        Some((horizontal, vertical)) => Some((
            border_glyph(horizontal, style.border_color, style.text_color)?,
            border_glyph(vertical, style.border_color, style.text_color)?,
        )),
        None => None,
    };

    let text = tree.get(&key).map(|n| n.text.as_bytes()).unwrap_or_default();
    let mut consumed = 0;
    for row in clip_y.start..clip_y.end {
        ansi::cursor_to(out, clip_x.start, row)?;
        for col in clip_x.start..clip_x.end {
            match &glyphs {
                Some((horizontal, _)) if row == y.start || row == y.end - 1 => {
                    out.write_bytes(horizontal);
                }
                Some((_, vertical)) if col == x.start || col == x.end - 1 => {
                    out.write_bytes(vertical);
                }
                _ if style.show_text && consumed < text.len() => {
                    out.write_byte(text[consumed]);
                    consumed += 1;
                }
                _ => out.write_byte(b' '),
            }
        }
    }

    ansi::reset(out)?;
    Ok(true)
}

/// Size of the box `key` is laid out in: its parent's effective size, or the
/// screen for the root.
///
/// An adaptive parent with an `Auto` side takes that side from its own
/// container, recursively.
pub(crate) fn content_size(tree: &Tree, key: &NodeKey, screen: ScreenSize) -> (i32, i32) {
    let Some(parent_key) = tree.get(key).and_then(|n| n.parent) else {
        return (screen.width, screen.height);
    };
    let Some(parent) = tree.get(&parent_key) else {
        return (screen.width, screen.height);
    };

    let outer = parent
        .style
        .auto_size
        .then(|| content_size(tree, &parent_key, screen));
    (
        effective(parent.volume.width, outer.map(|(w, _)| w)).unwrap_or(0),
        effective(parent.volume.height, outer.map(|(_, h)| h)).unwrap_or(0),
    )
}

fn effective(dimension: Dimension, inherited: Option<i32>) -> Option<i32> {
    match dimension {
        Dimension::Cells(n) => Some(n),
        Dimension::Auto => inherited,
    }
}

/// Border glyph with its color codes, restoring the text color afterwards.
fn border_glyph(glyph: char, border: Option<Color>, text: Option<Color>) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if let Some(color) = border {
        ansi::fg(&mut bytes, color)?;
    }
    let mut utf8 = [0u8; 4];
    bytes.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
    if let (Some(_), Some(color)) = (border, text) {
        ansi::fg(&mut bytes, color)?;
    }
    Ok(bytes)
}

/// Clamp a span start against the lower bound `lower`.
fn clamp_start(value: i32, lower: i32) -> i32 {
    if (value < lower || value <= 0) && lower <= 0 {
        0
    } else if value < lower {
        lower
    } else {
        value
    }
}

/// Clamp a span end against the upper bound `upper` and the screen `extent`.
fn clamp_end(value: i32, upper: i32, extent: i32) -> i32 {
    if (value > upper || value >= extent) && upper >= extent {
        extent
    } else if value > upper {
        upper
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_start() {
        assert_eq!(clamp_start(-3, 0), 0);
        assert_eq!(clamp_start(5, 0), 5);
        assert_eq!(clamp_start(2, 10), 10);
        assert_eq!(clamp_start(12, 10), 12);
        assert_eq!(clamp_start(-8, -5), 0);
    }

    #[test]
    fn test_clamp_end() {
        assert_eq!(clamp_end(7, 80, 80), 7);
        assert_eq!(clamp_end(95, 80, 80), 80);
        assert_eq!(clamp_end(30, 20, 80), 20);
        assert_eq!(clamp_end(50, 100, 80), 50);
        assert_eq!(clamp_end(90, 100, 80), 80);
    }

    #[test]
    fn test_effective_dimension() {
        assert_eq!(effective(Dimension::Cells(4), Some(9)), Some(4));
        assert_eq!(effective(Dimension::Auto, Some(9)), Some(9));
        assert_eq!(effective(Dimension::Auto, None), None);
    }

    #[test]
    fn test_border_glyph_colors() {
        assert_eq!(border_glyph('-', None, Some(Color::White)).unwrap(), b"-");
        assert_eq!(
            border_glyph('|', Some(Color::Red), None).unwrap(),
            b"\x1b[31m|"
        );
        assert_eq!(
            border_glyph('.', Some(Color::Red), Some(Color::White)).unwrap(),
            b"\x1b[31m.\x1b[37m"
        );
    }

    #[test]
    fn test_span_saturates() {
        assert_eq!(Span::sized(5, i32::MAX), Span { start: 5, end: i32::MAX });
        assert_eq!(Span::sized(-5, i32::MIN), Span { start: -5, end: i32::MIN });
        assert_eq!(Span::sized(2, 3), Span { start: 2, end: 5 });
    }
}
