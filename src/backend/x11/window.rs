// src/backend/x11/window.rs

//! The X11 window itself: creation, frame upload, pointer warp, and
//! bitmap cursors.

#![allow(non_snake_case)] // For X11 types

use super::connection::Connection;
use super::selection::SnarfAtoms;
use crate::cursor::{Cursor, CURSOR_BYTES, CURSOR_SIZE};
use crate::geom::Point;

use anyhow::{anyhow, Context, Result};
use libc::{c_char, c_int, c_long, c_uint};
use log::{debug, info, trace, warn};
use std::ffi::CString;
use std::mem;
use std::ptr;
use x11::xlib;

/// An X11 window plus the graphics context used for frame uploads.
///
/// Server-side resources are released by `destroy`, which the backend
/// calls before the `Connection` closes. `Drop` only logs if that was
/// skipped, since it has no display pointer to clean up with.
#[derive(Debug)]
pub(super) struct XWindow {
    id: xlib::Window,
    gc: xlib::GC,
    width_px: u32,
    height_px: u32,
    frame_scratch: Vec<u8>,
}

impl XWindow {
    /// Creates, configures, and maps a window of the given pixel size.
    pub fn create(
        connection: &Connection,
        atoms: &SnarfAtoms,
        width_px: u32,
        height_px: u32,
        title: &str,
    ) -> Result<Self> {
        info!("creating X11 window: {}x{} px", width_px, height_px);
        let display = connection.display();
        let screen = connection.screen();

        // SAFETY: Xlib FFI; the connection outlives this call.
        let id = unsafe {
            xlib::XCreateSimpleWindow(
                display,
                connection.root(),
                0,
                0,
                width_px as c_uint,
                height_px as c_uint,
                0, // border width
                xlib::XBlackPixel(display, screen),
                xlib::XWhitePixel(display, screen),
            )
        };
        if id == 0 {
            return Err(anyhow!("XCreateSimpleWindow failed"));
        }

        let title_cstr = CString::new(title).context("window title contains a NUL byte")?;
        // SAFETY: Xlib FFI on a freshly created window.
        let gc = unsafe {
            xlib::XSelectInput(
                display,
                id,
                xlib::ExposureMask
                    | xlib::KeyPressMask
                    | xlib::ButtonPressMask
                    | xlib::ButtonReleaseMask
                    | xlib::PointerMotionMask
                    | xlib::StructureNotifyMask
                    | xlib::FocusChangeMask,
            );

            xlib::XStoreName(display, id, title_cstr.as_ptr() as *mut c_char);

            // WM_DELETE_WINDOW so close-button clicks arrive as
            // ClientMessage events instead of a killed connection.
            let mut protocols = [atoms.wm_delete_window];
            xlib::XSetWMProtocols(display, id, protocols.as_mut_ptr(), 1);

            let gc = xlib::XCreateGC(display, id, 0, ptr::null_mut());

            xlib::XMapWindow(display, id);
            xlib::XFlush(display);
            gc
        };

        debug!("X11 window created (id {})", id);
        Ok(Self {
            id,
            gc,
            width_px,
            height_px,
            frame_scratch: Vec::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Records a new size reported by ConfigureNotify.
    pub fn update_size(&mut self, width_px: u32, height_px: u32) -> bool {
        if self.width_px == width_px && self.height_px == height_px {
            return false;
        }
        self.width_px = width_px;
        self.height_px = height_px;
        true
    }

    /// Copies a full RGBA frame into the window via XPutImage. The caller
    /// flushes separately when publishing.
    pub fn put_frame(&mut self, connection: &Connection, pixels: &[u8], width_px: u32, height_px: u32) -> Result<()> {
        trace!("uploading {}x{} frame to window {}", width_px, height_px, self.id);
        let display = connection.display();

        // The framebuffer is RGBA8 but a depth-24 TrueColor visual wants
        // 0x00RRGGBB pixels. Repack into BGRX and declare the image
        // LSB-first; XPutImage reorders for the server when it differs.
        repack_rgba_to_bgrx(pixels, &mut self.frame_scratch);

        // SAFETY: Xlib FFI. The XImage borrows the scratch buffer; its
        // data pointer is detached before XDestroyImage so Xlib never
        // frees our allocation.
        unsafe {
            let image = xlib::XCreateImage(
                display,
                connection.visual(),
                connection.depth() as c_uint,
                xlib::ZPixmap,
                0,
                self.frame_scratch.as_ptr() as *mut c_char,
                width_px,
                height_px,
                32, // bitmap pad
                0,  // bytes per line, auto
            );
            if image.is_null() {
                return Err(anyhow!("XCreateImage failed for {}x{} frame", width_px, height_px));
            }
            (*image).byte_order = xlib::LSBFirst;

            xlib::XPutImage(
                display, self.id, self.gc, image, 0, 0, 0, 0, width_px, height_px,
            );

            (*image).data = ptr::null_mut();
            xlib::XDestroyImage(image);
        }
        Ok(())
    }

    /// Warps the pointer to `p` in window coordinates.
    pub fn warp_pointer(&self, connection: &Connection, p: Point) -> Result<()> {
        let display = connection.display();
        // SAFETY: Xlib FFI; src window 0 means "unconditionally".
        unsafe {
            xlib::XWarpPointer(display, 0, self.id, 0, 0, 0, 0, p.x as c_int, p.y as c_int);
            xlib::XFlush(display);
        }
        Ok(())
    }

    /// Installs a two-plane bitmap cursor, or restores the default cursor
    /// for `None`.
    pub fn set_cursor(&mut self, connection: &Connection, cursor: Option<&Cursor>) -> Result<()> {
        let display = connection.display();
        let Some(c) = cursor else {
            // SAFETY: Xlib FFI; reverts to the parent window's cursor.
            unsafe {
                xlib::XUndefineCursor(display, self.id);
                xlib::XFlush(display);
            }
            return Ok(());
        };

        // X bitmaps are LSB-first within each byte; the cursor masks are
        // MSB-first, so every byte's bits get reversed. The source plane
        // is the shape (`set`) mask; the visibility mask is the union of
        // both planes.
        let mut source_bits = [0u8; CURSOR_BYTES];
        let mut mask_bits = [0u8; CURSOR_BYTES];
        for i in 0..CURSOR_BYTES {
            source_bits[i] = c.set[i].reverse_bits();
            mask_bits[i] = (c.clr[i] | c.set[i]).reverse_bits();
        }

        // The offset is added to the pointer position to place the
        // bitmap, so the hotspot within the bitmap is its negation.
        let hot_x = (-c.offset.x).clamp(0, CURSOR_SIZE as i32 - 1) as c_uint;
        let hot_y = (-c.offset.y).clamp(0, CURSOR_SIZE as i32 - 1) as c_uint;

        // SAFETY: Xlib FFI. The pixmaps and the cursor are freed before
        // returning; the server keeps its own copy of an installed cursor.
        unsafe {
            let source = xlib::XCreateBitmapFromData(
                display,
                self.id,
                source_bits.as_ptr() as *const c_char,
                CURSOR_SIZE as c_uint,
                CURSOR_SIZE as c_uint,
            );
            let mask = xlib::XCreateBitmapFromData(
                display,
                self.id,
                mask_bits.as_ptr() as *const c_char,
                CURSOR_SIZE as c_uint,
                CURSOR_SIZE as c_uint,
            );
            if source == 0 || mask == 0 {
                if source != 0 {
                    xlib::XFreePixmap(display, source);
                }
                if mask != 0 {
                    xlib::XFreePixmap(display, mask);
                }
                return Err(anyhow!("failed to create cursor pixmaps"));
            }

            let mut fg: xlib::XColor = mem::zeroed(); // black
            let mut bg: xlib::XColor = mem::zeroed();
            bg.red = 0xFFFF;
            bg.green = 0xFFFF;
            bg.blue = 0xFFFF;

            let cursor_id = xlib::XCreatePixmapCursor(
                display, source, mask, &mut fg, &mut bg, hot_x, hot_y,
            );
            xlib::XFreePixmap(display, source);
            xlib::XFreePixmap(display, mask);

            if cursor_id == 0 {
                return Err(anyhow!("XCreatePixmapCursor failed"));
            }
            xlib::XDefineCursor(display, self.id, cursor_id);
            xlib::XFreeCursor(display, cursor_id);
            xlib::XFlush(display);
        }
        Ok(())
    }

    /// Posts a WM_DELETE_WINDOW ClientMessage to this window. The message
    /// comes back through the event queue like a close-button click; no
    /// acknowledgment is waited for.
    pub fn post_close(&self, connection: &Connection, atoms: &SnarfAtoms) {
        let display = connection.display();
        // SAFETY: Xlib FFI; the event value is fully initialized below.
        unsafe {
            let mut message: xlib::XClientMessageEvent = mem::zeroed();
            message.type_ = xlib::ClientMessage;
            message.display = display;
            message.window = self.id;
            message.message_type = atoms.wm_protocols;
            message.format = 32;
            message.data.set_long(0, atoms.wm_delete_window as c_long);

            xlib::XSendEvent(
                display,
                self.id,
                xlib::False,
                xlib::NoEventMask,
                &mut message as *mut xlib::XClientMessageEvent as *mut xlib::XEvent,
            );
            xlib::XFlush(display);
        }
    }

    /// Destroys the window and its graphics context. Idempotent.
    pub fn destroy(&mut self, connection: &Connection) {
        if self.id == 0 {
            return;
        }
        debug!("destroying X11 window (id {})", self.id);
        let display = connection.display();
        // SAFETY: Xlib FFI on still-valid resources.
        unsafe {
            if !self.gc.is_null() {
                xlib::XFreeGC(display, self.gc);
                self.gc = ptr::null_mut();
            }
            xlib::XDestroyWindow(display, self.id);
            xlib::XFlush(display);
        }
        self.id = 0;
    }
}

impl Drop for XWindow {
    fn drop(&mut self) {
        if self.id != 0 {
            // destroy() needs the Connection, which we do not hold here;
            // the backend is responsible for calling it first.
            warn!("XWindow (id {}) dropped without destroy(); server resources may leak", self.id);
        }
    }
}

/// Converts row-major RGBA8 into little-endian BGRX, one `0x00RRGGBB`
/// pixel per four bytes. Alpha is dropped; the high byte of a depth-24
/// pixel is unused.
fn repack_rgba_to_bgrx(src: &[u8], dst: &mut Vec<u8>) {
    dst.resize(src.len(), 0);
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        out[0] = px[2];
        out[1] = px[1];
        out[2] = px[0];
        out[3] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_repack_rgba_pixels_into_bgrx_for_upload() {
        // One red pixel and one half-transparent blue pixel.
        let rgba = [0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x80];
        let mut packed = Vec::new();
        repack_rgba_to_bgrx(&rgba, &mut packed);
        assert_eq!(packed, [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn it_should_shrink_the_scratch_buffer_to_the_frame() {
        let mut packed = vec![0xAA; 16];
        repack_rgba_to_bgrx(&[0x10, 0x20, 0x30, 0x40], &mut packed);
        assert_eq!(packed, [0x30, 0x20, 0x10, 0x00]);
    }
}
