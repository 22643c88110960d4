// src/keys.rs

//! Backend-abstract keyboard types and the translation from key events to
//! the runes delivered on a display's keyboard channel.
//!
//! Backends report a `KeySymbol` plus `Modifiers` (and any text the
//! platform's input method produced); a `KeyTranslator` turns that into a
//! single rune using the Plan 9 private-use-area conventions for function
//! and navigation keys, which is what the embedding toolkit expects to
//! read.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifier state accompanying a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Option on macOS
        const SUPER = 1 << 3; // Windows / Command key
        const CAPS_LOCK = 1 << 4;
        const NUM_LOCK = 1 << 5;
    }
}

/// A key identity independent of any platform keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Modifier keys pressed on their own.
    Shift,
    Control,
    Alt,
    Super,
    CapsLock,
    NumLock,

    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,

    Enter,
    Backspace,
    Tab,
    Escape,
    PrintScreen,
    Menu,

    #[default]
    Unknown,
}

impl KeySymbol {
    /// Returns true for bare modifier presses, which translators drop.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeySymbol::Shift
                | KeySymbol::Control
                | KeySymbol::Alt
                | KeySymbol::Super
                | KeySymbol::CapsLock
                | KeySymbol::NumLock
        )
    }
}

// Plan 9 keyboard runes. Function and navigation keys live in the Unicode
// private use area starting at KEY_FN; the toolkit matches on these values.
pub const KEY_FN: char = '\u{F000}';
pub const KEY_HOME: char = '\u{F00D}';
pub const KEY_UP: char = '\u{F00E}';
pub const KEY_PAGE_UP: char = '\u{F00F}';
pub const KEY_PRINT: char = '\u{F010}';
pub const KEY_LEFT: char = '\u{F011}';
pub const KEY_RIGHT: char = '\u{F012}';
pub const KEY_PAGE_DOWN: char = '\u{F013}';
pub const KEY_INSERT: char = '\u{F014}';
pub const KEY_END: char = '\u{F018}';
pub const KEY_DOWN: char = '\u{0080}';
pub const KEY_CMD: char = '\u{F100}';

/// Translates backend key events into toolkit runes.
///
/// The display owns one translator; embedders substitute their own to
/// change keymaps without touching the backend.
pub trait KeyTranslator: Send {
    /// Returns the rune for a key event, or `None` if the event produces
    /// nothing (bare modifiers, unmapped keys).
    fn translate(
        &self,
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: Option<&str>,
    ) -> Option<char>;
}

/// The stock translation: navigation keys map to the Plan 9 runes above,
/// control chords fold onto C0 control characters, and anything printable
/// passes through the platform's own text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultKeyTranslator;

impl KeyTranslator for DefaultKeyTranslator {
    fn translate(
        &self,
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: Option<&str>,
    ) -> Option<char> {
        if symbol.is_modifier() {
            return None;
        }
        let rune = match symbol {
            KeySymbol::Home => KEY_HOME,
            KeySymbol::Up => KEY_UP,
            KeySymbol::PageUp => KEY_PAGE_UP,
            KeySymbol::PrintScreen => KEY_PRINT,
            KeySymbol::Left => KEY_LEFT,
            KeySymbol::Right => KEY_RIGHT,
            KeySymbol::PageDown => KEY_PAGE_DOWN,
            KeySymbol::Insert => KEY_INSERT,
            KeySymbol::End => KEY_END,
            KeySymbol::Down => KEY_DOWN,
            KeySymbol::Enter => '\n',
            KeySymbol::Tab => '\t',
            KeySymbol::Backspace => '\u{0008}',
            KeySymbol::Escape => '\u{001B}',
            KeySymbol::Delete => '\u{007F}',
            KeySymbol::Char(c) => {
                if modifiers.contains(Modifiers::CONTROL) {
                    return control_rune(c);
                }
                // Prefer the platform's composed text (dead keys, input
                // methods) when it is available.
                match text.and_then(|t| t.chars().next()) {
                    Some(composed) => composed,
                    None => c,
                }
            }
            _ => return text.and_then(|t| t.chars().next()),
        };
        Some(rune)
    }
}

/// Folds a Control chord onto its C0 control character, e.g. Ctrl-A -> 0x01.
fn control_rune(c: char) -> Option<char> {
    match c {
        'a'..='z' => char::from_u32(c as u32 - 'a' as u32 + 1),
        'A'..='Z' => char::from_u32(c as u32 - 'A' as u32 + 1),
        ' ' | '@' => Some('\u{0000}'),
        '[' => Some('\u{001B}'),
        '\\' => Some('\u{001C}'),
        ']' => Some('\u{001D}'),
        _ => Some(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_map_navigation_keys_to_plan9_runes() {
        let t = DefaultKeyTranslator;
        assert_eq!(t.translate(KeySymbol::Up, Modifiers::empty(), None), Some(KEY_UP));
        assert_eq!(t.translate(KeySymbol::Down, Modifiers::empty(), None), Some(KEY_DOWN));
        assert_eq!(t.translate(KeySymbol::Home, Modifiers::empty(), None), Some(KEY_HOME));
        assert_eq!(
            t.translate(KeySymbol::PageDown, Modifiers::empty(), None),
            Some(KEY_PAGE_DOWN)
        );
    }

    #[test]
    fn it_should_pass_through_composed_text_for_printable_keys() {
        let t = DefaultKeyTranslator;
        assert_eq!(
            t.translate(KeySymbol::Char('e'), Modifiers::empty(), Some("\u{00E9}")),
            Some('\u{00E9}')
        );
        assert_eq!(
            t.translate(KeySymbol::Char('x'), Modifiers::SHIFT, None),
            Some('x')
        );
    }

    #[test]
    fn it_should_fold_control_chords_onto_c0_characters() {
        let t = DefaultKeyTranslator;
        assert_eq!(
            t.translate(KeySymbol::Char('a'), Modifiers::CONTROL, Some("a")),
            Some('\u{0001}')
        );
        assert_eq!(
            t.translate(KeySymbol::Char('Z'), Modifiers::CONTROL, None),
            Some('\u{001A}')
        );
    }

    #[test]
    fn it_should_drop_bare_modifier_presses() {
        let t = DefaultKeyTranslator;
        assert_eq!(t.translate(KeySymbol::Shift, Modifiers::SHIFT, None), None);
        assert_eq!(t.translate(KeySymbol::Control, Modifiers::CONTROL, None), None);
    }
}
