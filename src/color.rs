// src/color.rs

//! Defines the 32-bit RGBA `Color` type and the standard constant colors
//! used for pre-allocated brushes.

use serde::{Deserialize, Serialize};

/// A color packed big-endian as `0xRRGGBBAA`.
///
/// Alpha is not premultiplied here; backends that need premultiplied
/// channels convert at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const OPAQUE: Color = Color(0xFFFF_FFFF);
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0x0000_00FF);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const RED: Color = Color(0xFF00_00FF);
    pub const GREEN: Color = Color(0x00FF_00FF);
    pub const BLUE: Color = Color(0x0000_FFFF);
    pub const CYAN: Color = Color(0x00FF_FFFF);
    pub const MAGENTA: Color = Color(0xFF00_FFFF);
    pub const YELLOW: Color = Color(0xFFFF_00FF);
    pub const PALE_YELLOW: Color = Color(0xFFFF_AAFF);
    pub const DARK_GREEN: Color = Color(0x4488_44FF);
    pub const PALE_GREEN: Color = Color(0xAAFF_AAFF);
    pub const PALE_BLUE: Color = Color(0x00CC_FFFF);
    pub const GREY_GREEN: Color = Color(0x55AA_AAFF);
    pub const GREY_BLUE: Color = Color(0x0088_CCFF);
    pub const PURPLE_BLUE: Color = Color(0x8888_CCFF);

    /// Splits the packed value into (red, green, blue, alpha) channels.
    #[inline]
    pub fn rgba(self) -> (u8, u8, u8, u8) {
        (
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
        )
    }

    /// Packs individual channels into a `Color`.
    #[inline]
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }
}
