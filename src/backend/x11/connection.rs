// src/backend/x11/connection.rs

//! The Xlib server connection, closed automatically on drop.

#![allow(non_snake_case)] // For X11 types

use anyhow::{anyhow, Result};
use libc::c_int;
use log::{debug, info, warn};
use std::ptr;
use x11::xlib;

/// An open connection to the X server plus the default screen resources
/// the backend needs. Dropping it closes the display.
#[derive(Debug)]
pub(super) struct Connection {
    display: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    visual: *mut xlib::Visual,
    depth: c_int,
}

impl Connection {
    /// Connects to the server named by `DISPLAY`.
    pub fn open() -> Result<Self> {
        // SAFETY: XOpenDisplay(NULL) reads the DISPLAY environment variable.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(anyhow!(
                "failed to open X display; check DISPLAY or the X server"
            ));
        }

        // SAFETY: display is non-null; these query default screen state.
        let (screen, root, visual, depth) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            let root = xlib::XRootWindow(display, screen);
            let visual = xlib::XDefaultVisual(display, screen);
            let depth = xlib::XDefaultDepth(display, screen);
            (screen, root, visual, depth)
        };
        if visual.is_null() {
            // Drop will not run for a partially built value; close by hand.
            unsafe { xlib::XCloseDisplay(display) };
            return Err(anyhow!("failed to get default visual for screen {}", screen));
        }

        info!("X11 connection established (screen {}, depth {})", screen, depth);
        Ok(Self {
            display,
            screen,
            root,
            visual,
            depth,
        })
    }

    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.display
    }

    #[inline]
    pub fn screen(&self) -> c_int {
        self.screen
    }

    #[inline]
    pub fn root(&self) -> xlib::Window {
        self.root
    }

    #[inline]
    pub fn visual(&self) -> *mut xlib::Visual {
        self.visual
    }

    #[inline]
    pub fn depth(&self) -> c_int {
        self.depth
    }

    /// Flushes the request buffer to the server.
    pub fn flush(&self) {
        // SAFETY: display is valid until drop.
        unsafe {
            xlib::XFlush(self.display);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if !self.display.is_null() {
            debug!("closing X11 display connection");
            // SAFETY: the pointer came from XOpenDisplay and is closed once.
            let status = unsafe { xlib::XCloseDisplay(self.display) };
            if status != 0 {
                warn!("XCloseDisplay returned non-zero status {}", status);
            }
            self.display = ptr::null_mut();
        }
    }
}
