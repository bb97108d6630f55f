//! Core types for tml-core.
//!
//! Everything a node stores (identity, placement, volume, style) and the event
//! kinds the bus understands. These are plain values: copying them out of a
//! node and writing them back through a setter is the whole editing model.

use std::fmt;

use bitflags::bitflags;
use uuid::Uuid;

// =============================================================================
// Identity
// =============================================================================

/// Name given to the root node.
pub const BODY_NAME: &str = "body";

/// Globally unique node identity, generated once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(Uuid);

impl NodeKey {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Widget kind discriminator.
///
/// Rendering dispatches on this with a `match`, so adding a kind means adding a
/// variant and a draw routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// A filled rectangle with optional border and text.
    #[default]
    Quadrilateral,
}

impl NodeKind {
    /// Tag string for this kind.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Quadrilateral => "quadrilateral",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Name, kind and key of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttr {
    pub name: String,
    pub kind: NodeKind,
    pub key: NodeKey,
}

// =============================================================================
// Volume
// =============================================================================

/// One side of a node's volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// Resolved from the ancestors at render time (adaptive nodes only).
    #[default]
    Auto,
    /// Size in terminal cells.
    Cells(i32),
}

impl Dimension {
    /// Concrete cell count, `None` for `Auto`.
    pub const fn cells(&self) -> Option<i32> {
        match self {
            Self::Auto => None,
            Self::Cells(n) => Some(*n),
        }
    }
}

impl From<i32> for Dimension {
    fn from(value: i32) -> Self {
        Self::Cells(value)
    }
}

/// Width and height of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    pub width: Dimension,
    pub height: Dimension,
}

impl Volume {
    /// Both sides resolved at render time.
    pub const AUTO: Self = Self {
        width: Dimension::Auto,
        height: Dimension::Auto,
    };

    /// Concrete volume in cells.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: Dimension::Cells(width),
            height: Dimension::Cells(height),
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

// =============================================================================
// Position
// =============================================================================

bitflags! {
    /// Set of axes a placement rule applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Axis: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const XY = Self::X.bits() | Self::Y.bits();
    }
}

/// Placement rules applied on top of the local offset.
///
/// Right-anchoring is evaluated after centering and wins on an axis where both
/// are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionType {
    pub center: Axis,
    pub right: Axis,
}

impl PositionType {
    /// Center on the given axes.
    pub const fn centered(axis: Axis) -> Self {
        Self {
            center: axis,
            right: Axis::empty(),
        }
    }

    /// Anchor to the parent's far edge on the given axes.
    pub const fn right_anchored(axis: Axis) -> Self {
        Self {
            center: Axis::empty(),
            right: axis,
        }
    }
}

/// Local offset relative to the parent, placement rules and paint weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub kind: PositionType,
    /// Lower paints first, so higher weights cover lower siblings.
    pub z_index: u32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: PositionType {
                center: Axis::empty(),
                right: Axis::empty(),
            },
            z_index: 0,
        }
    }

    pub const fn with_kind(mut self, kind: PositionType) -> Self {
        self.kind = kind;
        self
    }

    pub const fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }
}

// =============================================================================
// Style
// =============================================================================

/// The eight standard terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Purple = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// SGR parameter selecting this color as foreground (30-37).
    pub const fn fg_code(self) -> u8 {
        30 + self as u8
    }

    /// SGR parameter selecting this color as background (40-47).
    pub const fn bg_code(self) -> u8 {
        40 + self as u8
    }
}

/// Border drawn on the outermost ring of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderType {
    #[default]
    None = 0,
    /// `-` horizontally, `|` vertically.
    Solid = 1,
    /// `.` on both axes.
    Dotted = 2,
}

impl BorderType {
    /// `(horizontal, vertical)` glyphs, `None` when no border is drawn.
    pub const fn glyphs(&self) -> Option<(char, char)> {
        match self {
            Self::None => None,
            Self::Solid => Some(('-', '|')),
            Self::Dotted => Some(('.', '.')),
        }
    }
}

/// Visual attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Hidden nodes stay in the tree but neither they nor their subtree paint.
    pub display: bool,
    /// Resolve `Auto` sides from the ancestors and receive layout notifications.
    pub auto_size: bool,
    pub border: BorderType,
    pub border_color: Option<Color>,
    pub text_color: Option<Color>,
    pub background: Option<Color>,
    pub show_text: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: true,
            auto_size: false,
            border: BorderType::None,
            border_color: None,
            text_color: Some(Color::White),
            background: Some(Color::Black),
            show_text: true,
        }
    }
}

impl Style {
    /// Zero value used when a style cannot be read.
    pub(crate) const fn zeroed() -> Self {
        Self {
            display: false,
            auto_size: false,
            border: BorderType::None,
            border_color: None,
            text_color: None,
            background: None,
            show_text: false,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Notification kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Local position changed, or an ancestor moved/resized under a centered node.
    Moved,
    /// Volume changed, or an ancestor changed under an adaptive node.
    SizeChanged,
    Shown,
    Hidden,
    /// Text content changed.
    Input,
    Removed,
    /// The node received focus.
    Selected,
    /// A key arrived while the node held focus.
    KeyPressed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes() {
        assert_eq!(Color::Black.fg_code(), 30);
        assert_eq!(Color::White.fg_code(), 37);
        assert_eq!(Color::Blue.bg_code(), 44);
    }

    #[test]
    fn test_axis_contains() {
        assert!(Axis::XY.contains(Axis::X));
        assert!(Axis::XY.contains(Axis::Y));
        assert!(!Axis::X.contains(Axis::Y));
        assert!(Axis::empty().is_empty());
    }

    #[test]
    fn test_border_glyphs() {
        assert_eq!(BorderType::None.glyphs(), None);
        assert_eq!(BorderType::Solid.glyphs(), Some(('-', '|')));
        assert_eq!(BorderType::Dotted.glyphs(), Some(('.', '.')));
    }

    #[test]
    fn test_default_style() {
        let style = Style::default();
        assert!(style.display);
        assert!(style.show_text);
        assert!(!style.auto_size);
        assert_eq!(style.text_color, Some(Color::White));
        assert_eq!(style.background, Some(Color::Black));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = NodeKey::generate();
        let b = NodeKey::generate();
        assert_ne!(a, b);
    }
}
