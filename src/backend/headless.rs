// src/backend/headless.rs

//! In-process backend with no window system behind it.
//!
//! Holds an in-memory clipboard and records every call the display makes,
//! so tests (and windowless embedders) can observe the shim's behavior
//! without an X server.

use crate::backend::{WindowBackend, WindowEvent};
use crate::cursor::Cursor;
use crate::geom::Point;
use anyhow::{anyhow, Result};
use log::trace;

/// What the display asked `set_cursor` to do, recorded for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorChange {
    /// A custom bitmap cursor was installed; the hotspot is kept.
    Custom(Point),
    /// The platform default cursor was restored.
    Default,
}

/// A windowless `WindowBackend`.
#[derive(Debug)]
pub struct HeadlessBackend {
    width_px: u32,
    height_px: u32,
    scale: f64,
    clipboard: String,
    clipboard_broken: bool,
    queued: Vec<WindowEvent>,
    uploads: Vec<Vec<u8>>,
    publishes: usize,
    warps: Vec<Point>,
    cursor_changes: Vec<CursorChange>,
    close_signals: usize,
}

impl HeadlessBackend {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        HeadlessBackend {
            width_px,
            height_px,
            scale: 1.0,
            clipboard: String::new(),
            clipboard_broken: false,
            queued: Vec::new(),
            uploads: Vec::new(),
            publishes: 0,
            warps: Vec::new(),
            cursor_changes: Vec::new(),
            close_signals: 0,
        }
    }

    /// Queues an event for the next `poll_events`.
    pub fn push_event(&mut self, event: WindowEvent) {
        self.queued.push(event);
    }

    /// Seeds the in-memory clipboard, as if another application wrote it.
    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Makes subsequent clipboard calls fail, simulating a lost selection
    /// owner or a dead server connection.
    pub fn break_clipboard(&mut self) {
        self.clipboard_broken = true;
    }

    /// Pretends the window sits on a scaled output (1.0 is unscaled).
    pub fn set_scale_factor(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn uploads(&self) -> &[Vec<u8>] {
        &self.uploads
    }

    pub fn publish_count(&self) -> usize {
        self.publishes
    }

    pub fn warps(&self) -> &[Point] {
        &self.warps
    }

    pub fn cursor_changes(&self) -> &[CursorChange] {
        &self.cursor_changes
    }

    pub fn close_signals(&self) -> usize {
        self.close_signals
    }
}

impl WindowBackend for HeadlessBackend {
    fn poll_events(&mut self) -> Result<Vec<WindowEvent>> {
        Ok(self.queued.drain(..).collect())
    }

    fn upload(&mut self, pixels: &[u8], width_px: u32, height_px: u32) -> Result<()> {
        trace!("headless upload: {}x{} px", width_px, height_px);
        self.width_px = width_px;
        self.height_px = height_px;
        self.uploads.push(pixels.to_vec());
        Ok(())
    }

    fn publish(&mut self) -> Result<()> {
        self.publishes += 1;
        Ok(())
    }

    fn warp_pointer(&mut self, p: Point) -> Result<()> {
        self.warps.push(p);
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Option<&Cursor>) -> Result<()> {
        self.cursor_changes.push(match cursor {
            Some(c) => CursorChange::Custom(c.offset),
            None => CursorChange::Default,
        });
        Ok(())
    }

    fn read_clipboard(&mut self) -> Result<String> {
        if self.clipboard_broken {
            return Err(anyhow!("clipboard unavailable"));
        }
        Ok(self.clipboard.clone())
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        if self.clipboard_broken {
            return Err(anyhow!("clipboard unavailable"));
        }
        self.clipboard = text.to_string();
        Ok(())
    }

    fn send_close(&mut self) {
        self.close_signals += 1;
    }

    fn size_px(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }
}
