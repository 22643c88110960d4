// src/font.rs

//! The default font reference carried by a `Display`.
//!
//! This is only a reference (name plus height); glyph shaping and
//! rasterization belong to whatever text stack the embedding toolkit
//! uses.

/// Initial font size for a new display when the config does not override it.
pub const DEFAULT_FONT_SIZE: i32 = 10;

/// A named font at a fixed pixel height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    /// Height of a line in pixels.
    pub height: i32,
}

impl Font {
    pub fn new(name: impl Into<String>, height: i32) -> Self {
        Font {
            name: name.into(),
            height,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("monospace", DEFAULT_FONT_SIZE)
    }
}
