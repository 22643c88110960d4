// src/backend/x11/mod.rs

//! The X11 `WindowBackend`: an Xlib window with XPutImage presentation,
//! pointer warping, pixmap cursors, and snarf over the CLIPBOARD
//! selection.

mod connection;
mod event;
mod selection;
mod window;

use self::connection::Connection;
use self::event::{translate_xevent, Translated};
use self::selection::SnarfAtoms;
use self::window::XWindow;

use crate::backend::{WindowBackend, WindowEvent};
use crate::config::DisplayConfig;
use crate::cursor::Cursor;
use crate::geom::Point;

use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::collections::VecDeque;
use std::mem;
use x11::xlib;

pub struct X11Backend {
    connection: Connection,
    window: XWindow,
    atoms: SnarfAtoms,
    /// Snarf text we currently own the CLIPBOARD selection for.
    owned_snarf: Option<String>,
    /// Events translated while waiting for selection traffic, delivered
    /// on the next `poll_events`.
    pending: VecDeque<WindowEvent>,
}

impl X11Backend {
    /// Connects to the X server and opens a mapped window at the
    /// configured size.
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        let connection = Connection::open()?;
        let atoms =
            SnarfAtoms::new(&connection).context("failed to intern selection atoms")?;
        let window = XWindow::create(
            &connection,
            &atoms,
            config.width_px,
            config.height_px,
            &config.title,
        )?;
        info!("X11 backend ready (window id {})", window.id());
        Ok(Self {
            connection,
            window,
            atoms,
            owned_snarf: None,
            pending: VecDeque::new(),
        })
    }

    /// Pulls one native event off the queue, blocking until one arrives.
    fn next_xevent(&self) -> xlib::XEvent {
        // SAFETY: FFI; XNextEvent fills the out-event.
        unsafe {
            let mut xevent: xlib::XEvent = mem::zeroed();
            xlib::XNextEvent(self.connection.display(), &mut xevent);
            xevent
        }
    }

    fn handle(&mut self, mut xevent: xlib::XEvent) -> Translated {
        let translated = translate_xevent(
            &self.connection,
            &mut self.window,
            &self.atoms,
            self.owned_snarf.as_deref(),
            &mut xevent,
        );
        if let Translated::SelectionLost = translated {
            self.owned_snarf = None;
        }
        translated
    }

    fn pending_count(&self) -> i32 {
        // SAFETY: FFI; counts queued events without blocking.
        unsafe { xlib::XPending(self.connection.display()) }
    }
}

impl WindowBackend for X11Backend {
    fn poll_events(&mut self) -> Result<Vec<WindowEvent>> {
        let mut events: Vec<WindowEvent> = self.pending.drain(..).collect();
        while self.pending_count() > 0 {
            let xevent = self.next_xevent();
            match self.handle(xevent) {
                Translated::Event(e) => events.push(e),
                // A stray delivery with no read in flight has nothing to
                // attach to.
                Translated::SelectionDelivered(_) => {
                    trace!("dropping unsolicited selection delivery")
                }
                Translated::SelectionLost | Translated::Nothing => {}
            }
        }
        Ok(events)
    }

    fn upload(&mut self, pixels: &[u8], width_px: u32, height_px: u32) -> Result<()> {
        self.window
            .put_frame(&self.connection, pixels, width_px, height_px)
    }

    fn publish(&mut self) -> Result<()> {
        self.connection.flush();
        Ok(())
    }

    fn warp_pointer(&mut self, p: Point) -> Result<()> {
        self.window.warp_pointer(&self.connection, p)
    }

    fn set_cursor(&mut self, cursor: Option<&Cursor>) -> Result<()> {
        self.window.set_cursor(&self.connection, cursor)
    }

    fn read_clipboard(&mut self) -> Result<String> {
        // If we own the selection, answering through the server would
        // just round-trip back to us; SelectionClear keeps this honest.
        if let Some(text) = &self.owned_snarf {
            return Ok(text.clone());
        }

        debug!("requesting CLIPBOARD conversion to UTF8_STRING");
        // SAFETY: FFI; asks the owner to convert into our property.
        unsafe {
            xlib::XConvertSelection(
                self.connection.display(),
                self.atoms.clipboard,
                self.atoms.utf8_string,
                self.atoms.snarf_property,
                self.window.id(),
                xlib::CurrentTime,
            );
        }
        self.connection.flush();

        // The server answers every conversion request with a
        // SelectionNotify, so blocking here terminates. Unrelated events
        // are stashed for the next poll_events.
        loop {
            let xevent = self.next_xevent();
            match self.handle(xevent) {
                Translated::SelectionDelivered(Some(text)) => return Ok(text),
                Translated::SelectionDelivered(None) => return Ok(String::new()),
                Translated::Event(e) => self.pending.push_back(e),
                Translated::SelectionLost | Translated::Nothing => {}
            }
        }
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        self.owned_snarf = Some(text.to_string());
        // SAFETY: FFI; claims the CLIPBOARD selection for our window.
        unsafe {
            xlib::XSetSelectionOwner(
                self.connection.display(),
                self.atoms.clipboard,
                self.window.id(),
                xlib::CurrentTime,
            );
        }
        self.connection.flush();
        debug!("took CLIPBOARD selection ownership ({} bytes)", text.len());
        Ok(())
    }

    fn send_close(&mut self) {
        self.window.post_close(&self.connection, &self.atoms);
    }

    fn size_px(&self) -> (u32, u32) {
        self.window.size()
    }

    fn scale_factor(&self) -> f64 {
        // SAFETY: FFI; queries physical and pixel dimensions of the screen.
        let (width_px, width_mm) = unsafe {
            let display = self.connection.display();
            let screen = self.connection.screen();
            (
                xlib::XDisplayWidth(display, screen),
                xlib::XDisplayWidthMM(display, screen),
            )
        };
        if width_mm <= 0 {
            return 1.0;
        }
        let dpi = width_px as f64 * 25.4 / width_mm as f64;
        (dpi / 96.0).max(1.0)
    }
}

impl Drop for X11Backend {
    fn drop(&mut self) {
        self.window.destroy(&self.connection);
        // Connection's own Drop closes the display afterwards.
    }
}
