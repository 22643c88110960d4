// src/backend/mod.rs

//! The window/surface boundary: the `WindowBackend` trait every platform
//! backend implements, and the `WindowEvent` type backends translate
//! native events into.
//!
//! The display layer never touches platform APIs directly; it sequences
//! calls into a boxed `WindowBackend`. The headless backend serves tests
//! and windowless embedders; the X11 backend is the real one on Linux.

use crate::cursor::Cursor;
use crate::geom::Point;
use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;

pub mod headless;
#[cfg(all(unix, feature = "x11-backend"))]
pub mod x11;

pub use headless::HeadlessBackend;
#[cfg(all(unix, feature = "x11-backend"))]
pub use x11::X11Backend;

/// A platform event, already translated out of its native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A key was pressed. `text` carries whatever composed text the
    /// platform's input method produced, if any.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: Option<String>,
    },
    /// A mouse button went down. Buttons are numbered X11-style:
    /// 1 left, 2 middle, 3 right, 4 scroll up, 5 scroll down.
    MouseButtonPress {
        button: u8,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },
    /// A mouse button came up.
    MouseButtonRelease {
        button: u8,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },
    /// The pointer moved.
    MouseMove {
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },
    /// The platform resized the window.
    Resize { width_px: u32, height_px: u32 },
    /// The window gained input focus.
    FocusGained,
    /// The window lost input focus.
    FocusLost,
    /// The platform asked the window to close.
    CloseRequested,
}

/// The capability set a display needs from its window: event polling,
/// buffer upload and publish, pointer warp, cursor install, clipboard
/// text round-trip, and a fire-and-forget close signal.
pub trait WindowBackend {
    /// Drains pending native events, translated to `WindowEvent`s.
    fn poll_events(&mut self) -> Result<Vec<WindowEvent>>;

    /// Uploads a full frame of row-major RGBA8 pixels to the window's
    /// backing surface. Does not make it visible; `publish` does.
    fn upload(&mut self, pixels: &[u8], width_px: u32, height_px: u32) -> Result<()>;

    /// Asks the compositor to present the last uploaded frame.
    fn publish(&mut self) -> Result<()>;

    /// Repositions the platform pointer inside the window.
    fn warp_pointer(&mut self, p: Point) -> Result<()>;

    /// Installs a bitmap cursor, or restores the platform default cursor
    /// when `cursor` is `None`.
    fn set_cursor(&mut self, cursor: Option<&Cursor>) -> Result<()>;

    /// Reads the platform clipboard as UTF-8 text.
    fn read_clipboard(&mut self) -> Result<String>;

    /// Replaces the platform clipboard contents with `text`.
    fn write_clipboard(&mut self, text: &str) -> Result<()>;

    /// Sends the window-destroyed lifecycle signal. Fire and forget: no
    /// acknowledgment, and repeated sends are the backend's business.
    fn send_close(&mut self);

    /// Current window size in pixels.
    fn size_px(&self) -> (u32, u32);

    /// Display scale factor, for backends that can report one.
    fn scale_factor(&self) -> f64 {
        1.0
    }
}
