// src/display.rs

//! The per-window `Display` handle returned to the embedding toolkit.
//!
//! A display aggregates the window backend handle, the shared screen
//! buffer, the default font, four pre-allocated solid-color images, and
//! the mouse/keyboard channel wrappers. Every non-trivial behavior is
//! delegated to the backend; this layer only sequences calls into it
//! (allocate, lock, upload, publish) and translates input events.

use crate::backend::{WindowBackend, WindowEvent};
use crate::color::Color;
use crate::config::DisplayConfig;
use crate::cursor::Cursor;
use crate::font::Font;
use crate::geom::{pt, rect, Point, Rectangle};
use crate::image::{Image, Pix};
use crate::input::{
    keyboard_channel, mouse_channel, Buttons, Keyboardctl, Mouse, Mousectl,
};
use crate::keys::{DefaultKeyTranslator, KeyTranslator};

use anyhow::{anyhow, Result};
use log::{debug, info, trace};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use thiserror::Error;

/// Baseline DPI. `scale_size` scales relative to this; displays at or
/// below it render unscaled.
pub const DEFAULT_DPI: i32 = 100;

/// Refresh algorithm to run when a window is resized or uncovered.
///
/// Accepted by `Display::attach` for contract parity with the abstract
/// display interface; the backend repaints on its own, so the choice has
/// no effect here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Backup,
    None,
    Message,
}

/// Errors from the snarf (clipboard) operations.
///
/// `BufferTooShort` is a soft error: the read itself succeeded and the
/// caller's buffer holds a truncated prefix. It is distinguishable from an
/// access failure by `copied > 0` (or simply by the variant).
#[derive(Debug, Error)]
pub enum SnarfError {
    #[error("clipboard access failed")]
    Clipboard(#[source] anyhow::Error),
    #[error("read snarf: buffer too short ({copied} of {total} bytes copied)")]
    BufferTooShort { copied: usize, total: usize },
}

/// The window's backing pixel store: row-major RGBA8.
#[derive(Debug)]
pub struct ScreenBuffer {
    width_px: u32,
    height_px: u32,
    pub pixels: Vec<u8>,
}

const BYTES_PER_PIXEL: usize = 4;

impl ScreenBuffer {
    fn new(width_px: u32, height_px: u32) -> Self {
        ScreenBuffer {
            width_px,
            height_px,
            pixels: vec![0u8; width_px as usize * height_px as usize * BYTES_PER_PIXEL],
        }
    }

    #[inline]
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    #[inline]
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Full bounds of the buffer as a rectangle at the origin.
    pub fn bounds(&self) -> Rectangle {
        rect(0, 0, self.width_px as i32, self.height_px as i32)
    }

    /// Reallocates for a new window size. Contents are not preserved; the
    /// toolkit repaints after a resize anyway.
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.width_px = width_px;
        self.height_px = height_px;
        self.pixels = vec![0u8; width_px as usize * height_px as usize * BYTES_PER_PIXEL];
    }
}

/// Shared handle to the window's framebuffer.
///
/// The toolkit draws by locking the buffer and writing pixels; nothing
/// becomes visible until `Display::flush`. `flush`, `move_to`, and
/// `set_cursor` take the same lock, so buffer uploads never race pointer
/// or cursor updates.
#[derive(Debug, Clone)]
pub struct ScreenImage {
    buf: Arc<Mutex<ScreenBuffer>>,
}

impl ScreenImage {
    /// Acquires exclusive access to the pixel store.
    pub fn lock(&self) -> Result<MutexGuard<'_, ScreenBuffer>> {
        self.buf
            .lock()
            .map_err(|_| anyhow!("screen buffer lock poisoned"))
    }

    /// Current bounds of the framebuffer.
    pub fn bounds(&self) -> Result<Rectangle> {
        Ok(self.lock()?.bounds())
    }
}

/// One on-screen window: framebuffer, default font, constant-color
/// brushes, input channels, and clipboard access.
pub struct Display {
    /// Dots per inch, used by `scale_size`.
    pub dpi: i32,
    /// Pre-allocated solid black brush.
    pub black: Image,
    /// Pre-allocated solid white brush.
    pub white: Image,
    /// Pre-allocated fully opaque brush.
    pub opaque: Image,
    /// Pre-allocated fully transparent brush.
    pub transparent: Image,
    /// The default font reference.
    pub default_font: Font,

    screen: ScreenImage,
    window: Box<dyn WindowBackend>,
    key_translator: Box<dyn KeyTranslator>,

    mouse: Mousectl,
    keyboard: Keyboardctl,
    mouse_tx: Sender<Mouse>,
    resize_tx: Sender<(u32, u32)>,
    rune_tx: Sender<char>,

    mouse_state: Mouse,
    epoch: Instant,
    close_requested: bool,
}

impl Display {
    /// Builds the display for a freshly opened window.
    ///
    /// Called once per window by the embedder, which constructs the
    /// backend first (at the configured size) and hands it over here.
    pub fn init(window: Box<dyn WindowBackend>, config: &DisplayConfig) -> Result<Display> {
        let (mut width_px, mut height_px) = window.size_px();
        if width_px == 0 || height_px == 0 {
            width_px = config.width_px;
            height_px = config.height_px;
        }
        // dpi 0 defers to the backend's scale factor (1.0 is baseline).
        let dpi = if config.dpi > 0 {
            config.dpi
        } else {
            (DEFAULT_DPI as f64 * window.scale_factor()).round() as i32
        };
        info!(
            "Initializing display: {}x{} px, dpi {}",
            width_px, height_px, dpi
        );

        let screen = ScreenImage {
            buf: Arc::new(Mutex::new(ScreenBuffer::new(width_px, height_px))),
        };
        let (mouse, mouse_tx, resize_tx) = mouse_channel();
        let (keyboard, rune_tx) = keyboard_channel();

        let brush = rect(0, 0, 1, 1);
        Ok(Display {
            dpi,
            black: Image::uniform(brush, Pix::Rgba32, Color::BLACK),
            white: Image::uniform(brush, Pix::Rgba32, Color::WHITE),
            opaque: Image::uniform(brush, Pix::Rgba32, Color::OPAQUE),
            transparent: Image::uniform(brush, Pix::Rgba32, Color::TRANSPARENT),
            default_font: Font::new(config.font.name.clone(), config.font.size),
            screen,
            window,
            key_translator: Box::new(DefaultKeyTranslator),
            mouse,
            keyboard,
            mouse_tx,
            resize_tx,
            rune_tx,
            mouse_state: Mouse::default(),
            epoch: Instant::now(),
            close_requested: false,
        })
    }

    /// Replaces the key translator. Embedders with their own keymap call
    /// this right after `init`.
    pub fn set_key_translator(&mut self, translator: Box<dyn KeyTranslator>) {
        self.key_translator = translator;
    }

    /// Allocates a new image filled with `color`.
    ///
    /// Toolkits allocate solid-color brushes as a single-pixel rectangle
    /// with `repl` set; those come back as uniform images with no backing
    /// store. Any other request materializes a buffer sized to `r`.
    ///
    /// The fallible signature is kept for backends whose allocation can
    /// fail; the current logic never errs.
    pub fn alloc_image(&self, r: Rectangle, pix: Pix, repl: bool, color: Color) -> Result<Image> {
        // Ignore repl unless the image is a single pixel.
        if repl && r.max.x == 1 && r.max.y == 1 {
            Ok(Image::uniform(r, pix, color))
        } else {
            Ok(Image::filled(r, pix, color))
        }
    }

    /// (Re-)attaches to the display after a resize.
    ///
    /// The refresh algorithm is accepted for contract parity only; the
    /// backend repaints itself, so this does nothing.
    pub fn attach(&mut self, refresh: Refresh) -> Result<()> {
        trace!("attach: refresh {:?} ignored", refresh);
        Ok(())
    }

    /// Sends the window-destroyed lifecycle signal to the backend.
    ///
    /// Does not block for acknowledgment; double-close behavior is
    /// whatever the backend tolerates.
    pub fn close(&mut self) -> Result<()> {
        debug!("display close requested");
        self.window.send_close();
        Ok(())
    }

    /// Uploads the screen buffer's full bounds to the backing surface and
    /// asks the compositor to publish, under exclusive lock. This is the
    /// only path that makes pixel writes visible.
    pub fn flush(&mut self) -> Result<()> {
        let buf = self.screen.lock()?;
        self.window
            .upload(&buf.pixels, buf.width_px(), buf.height_px())?;
        self.window.publish()
    }

    /// Returns the display's single shared mouse channel wrapper.
    pub fn init_mouse(&self) -> &Mousectl {
        &self.mouse
    }

    /// Returns the display's single shared keyboard channel wrapper.
    pub fn init_keyboard(&self) -> &Keyboardctl {
        &self.keyboard
    }

    /// Warps the platform pointer to `p`, under the screen lock.
    pub fn move_to(&mut self, p: Point) -> Result<()> {
        let _guard = self.screen.lock()?;
        self.window.warp_pointer(p)
    }

    /// Enables debugging on the display server. Accepted for contract
    /// parity; has no effect.
    pub fn set_debug(&mut self, debug: bool) {
        trace!("set_debug({}) ignored", debug);
    }

    /// Reads the snarf buffer (platform clipboard) into `buf`.
    ///
    /// Returns (bytes written, total content length). When the content
    /// exceeds `buf`, the prefix is copied and the soft error
    /// `SnarfError::BufferTooShort` reports both counts so the caller can
    /// detect truncation. Backend failures propagate unmodified inside
    /// `SnarfError::Clipboard`.
    pub fn read_snarf(&mut self, buf: &mut [u8]) -> Result<(usize, usize), SnarfError> {
        let text = self
            .window
            .read_clipboard()
            .map_err(SnarfError::Clipboard)?;
        let src = text.as_bytes();
        if src.len() <= buf.len() {
            buf[..src.len()].copy_from_slice(src);
            Ok((src.len(), src.len()))
        } else {
            let copied = buf.len();
            buf.copy_from_slice(&src[..copied]);
            Err(SnarfError::BufferTooShort {
                copied,
                total: src.len(),
            })
        }
    }

    /// Writes `data` to the snarf buffer as text, overwriting any previous
    /// content.
    pub fn write_snarf(&mut self, data: &[u8]) -> Result<()> {
        let text = String::from_utf8_lossy(data);
        self.window.write_clipboard(&text)
    }

    /// Scales `n` for this display's DPI with nearest rounding, relative
    /// to the `DEFAULT_DPI` baseline. At or below baseline, `n` passes
    /// through unchanged.
    pub fn scale_size(&self, n: i32) -> i32 {
        if self.dpi <= DEFAULT_DPI {
            return n;
        }
        (n * self.dpi + DEFAULT_DPI / 2) / DEFAULT_DPI
    }

    /// Installs a custom bitmap cursor, or restores the platform default
    /// when `cursor` is `None`. Runs under the screen lock.
    pub fn set_cursor(&mut self, cursor: Option<&Cursor>) -> Result<()> {
        let _guard = self.screen.lock()?;
        self.window.set_cursor(cursor)
    }

    /// Shared handle to the window's framebuffer.
    pub fn screen_image(&self) -> ScreenImage {
        self.screen.clone()
    }

    /// True once the platform has asked the window to close.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Drains backend events and feeds the input channels.
    ///
    /// The embedding toolkit calls this from its event loop. Key presses
    /// run through the key translator and land on the keyboard channel;
    /// button and motion events become `Mouse` states on the mouse
    /// channel; resizes reallocate the screen buffer and signal the
    /// mouse wrapper's resize channel.
    pub fn pump_events(&mut self) -> Result<()> {
        for event in self.window.poll_events()? {
            match event {
                WindowEvent::Key {
                    symbol,
                    modifiers,
                    text,
                } => {
                    if let Some(rune) =
                        self.key_translator
                            .translate(symbol, modifiers, text.as_deref())
                    {
                        let _ = self.rune_tx.send(rune);
                    }
                }
                WindowEvent::MouseButtonPress { button, x, y, .. } => {
                    self.mouse_state.buttons |= button_bit(button);
                    self.mouse_state.xy = pt(x, y);
                    self.send_mouse();
                }
                WindowEvent::MouseButtonRelease { button, x, y, .. } => {
                    self.mouse_state.buttons &= !button_bit(button);
                    self.mouse_state.xy = pt(x, y);
                    self.send_mouse();
                }
                WindowEvent::MouseMove { x, y, .. } => {
                    self.mouse_state.xy = pt(x, y);
                    self.send_mouse();
                }
                WindowEvent::Resize {
                    width_px,
                    height_px,
                } => {
                    debug!("window resized to {}x{} px", width_px, height_px);
                    self.screen.lock()?.resize(width_px, height_px);
                    let _ = self.resize_tx.send((width_px, height_px));
                }
                WindowEvent::CloseRequested => {
                    info!("window close requested by platform");
                    self.close_requested = true;
                }
                WindowEvent::FocusGained | WindowEvent::FocusLost => {
                    trace!("focus change ignored");
                }
            }
        }
        Ok(())
    }

    fn send_mouse(&mut self) {
        self.mouse_state.msec = self.epoch.elapsed().as_millis() as u32;
        let _ = self.mouse_tx.send(self.mouse_state);
    }
}

/// Maps an X11-style button number onto the button word.
fn button_bit(button: u8) -> Buttons {
    match button {
        1 => Buttons::LEFT,
        2 => Buttons::MIDDLE,
        3 => Buttons::RIGHT,
        4 => Buttons::SCROLL_UP,
        5 => Buttons::SCROLL_DOWN,
        _ => Buttons::empty(),
    }
}

#[cfg(test)]
mod tests;
