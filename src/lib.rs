// src/lib.rs

//! ninedraw: a per-window display handle for a UI toolkit.
//!
//! Each on-screen window is represented by a [`Display`] aggregating an
//! attached framebuffer, a default font, pre-allocated solid-color
//! brushes, mouse/keyboard input channels, and clipboard (snarf) access.
//! Drawing, compositing, and event delivery are all performed by a
//! pluggable [`backend::WindowBackend`]; this crate only sequences calls
//! into it and translates input events for the embedding toolkit.
//!
//! Typical setup (on Linux, `backend::X11Backend::new` constructs the
//! real windowed backend the same way):
//!
//! ```no_run
//! use ninedraw::{backend::HeadlessBackend, Display, DisplayConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DisplayConfig::default();
//! let backend = HeadlessBackend::new(config.width_px, config.height_px);
//! let mut display = Display::init(Box::new(backend), &config)?;
//!
//! // Draw into the framebuffer, then make it visible:
//! {
//!     let screen = display.screen_image();
//!     let mut buf = screen.lock()?;
//!     buf.pixels.fill(0xFF);
//! }
//! display.flush()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod color;
pub mod config;
pub mod cursor;
pub mod display;
pub mod font;
pub mod geom;
pub mod image;
pub mod input;
pub mod keys;

pub use color::Color;
pub use config::{DisplayConfig, FontConfig};
pub use cursor::Cursor;
pub use display::{Display, Refresh, ScreenImage, SnarfError, DEFAULT_DPI};
pub use font::{Font, DEFAULT_FONT_SIZE};
pub use geom::{pt, rect, Point, Rectangle};
pub use image::{Image, Pix};
pub use input::{Buttons, Keyboardctl, Mouse, Mousectl};
pub use keys::{DefaultKeyTranslator, KeySymbol, KeyTranslator, Modifiers};
