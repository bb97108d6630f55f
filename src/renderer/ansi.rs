//! ANSI escape sequences for terminal control.
//!
//! Only the VT100 subset the compositor draws with, plus the cursor and
//! screen codes an application needs when it hands the terminal back.

use std::io::Write;

use crate::types::Color;

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to absolute position (0-indexed in, 1-indexed on the wire).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, col: i32, row: i32) -> std::io::Result<()> {
    write!(w, "\x1b[{};{}H", row + 1, col + 1)
}

/// Hide cursor.
#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25l")
}

/// Show cursor.
#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25h")
}

// =============================================================================
// Screen
// =============================================================================

/// Clear entire screen.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[2J")
}

// =============================================================================
// Colors & Attributes
// =============================================================================

/// Reset all attributes.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[0m")
}

/// Set foreground color.
#[inline]
pub fn fg<W: Write>(w: &mut W, color: Color) -> std::io::Result<()> {
    write!(w, "\x1b[{}m", color.fg_code())
}

/// Set background color.
#[inline]
pub fn bg<W: Write>(w: &mut W, color: Color) -> std::io::Result<()> {
    write!(w, "\x1b[{}m", color.bg_code())
}
