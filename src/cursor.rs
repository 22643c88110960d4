// src/cursor.rs

//! The fixed-size bitmap cursor passed to `Display::set_cursor`.

use crate::geom::Point;

/// Side length of a cursor bitmap in pixels.
pub const CURSOR_SIZE: usize = 16;

/// Bytes in one cursor mask: 16 rows of 2 bytes (1 bit per pixel).
pub const CURSOR_BYTES: usize = 2 * CURSOR_SIZE;

/// A 16x16 two-plane cursor image plus its hotspot.
///
/// `clr` is the color (outline) mask and `set` the shape (fill) mask, one
/// bit per pixel, rows packed two bytes each, most significant bit
/// leftmost. `offset` is added to the pointer position to place the
/// hotspot, so a hotspot in the middle of the bitmap uses a negative
/// offset. Constructed by the caller and consumed immediately by
/// `set_cursor`; nothing here is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: Point,
    pub clr: [u8; CURSOR_BYTES],
    pub set: [u8; CURSOR_BYTES],
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            offset: Point::default(),
            clr: [0; CURSOR_BYTES],
            set: [0; CURSOR_BYTES],
        }
    }
}
