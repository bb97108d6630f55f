//! Keyboard event surface.
//!
//! Keystrokes arrive from crossterm and are converted once, at the edge, into
//! a [`KeyboardEvent`]. The focused node stores the last one it received; a
//! `KeyPressed` callback reads it back with `Node::keyboard_event`.

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// One keystroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Key name: the character itself for printable keys, otherwise a name
    /// such as "Enter", "ArrowUp" or "F5". Empty for keys with no name.
    pub key: String,
    /// The character typed, for printable keys.
    pub rune: Option<char>,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// A named key with no modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rune: None,
            modifiers: Modifiers::default(),
        }
    }

    /// A printable character.
    pub fn char(c: char) -> Self {
        Self {
            key: c.to_string(),
            rune: Some(c),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_char(&self, c: char) -> bool {
        self.rune == Some(c)
    }
}

// =============================================================================
// CROSSTERM CONVERSION
// =============================================================================

impl From<CrosstermKeyEvent> for KeyboardEvent {
    fn from(event: CrosstermKeyEvent) -> Self {
        let rune = match event.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };
        let key = match event.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::Insert => "Insert".to_string(),
            _ => String::new(),
        };

        KeyboardEvent {
            key,
            rune,
            modifiers: convert_modifiers(event.modifiers),
        }
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

// =============================================================================
// TESTS
// =============================================================================
