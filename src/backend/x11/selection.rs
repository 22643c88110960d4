// src/backend/x11/selection.rs

//! Interned X atoms for the snarf (CLIPBOARD selection) round-trip.

#![allow(non_snake_case)] // For X11 types

use super::connection::Connection;
use anyhow::{anyhow, Context, Result};
use libc::c_char;
use x11::xlib;

/// The atoms the snarf implementation needs: the selection names, the text
/// target types, and the window property selection data is delivered to.
#[derive(Debug, Clone, Copy)]
pub(super) struct SnarfAtoms {
    pub clipboard: xlib::Atom,
    pub targets: xlib::Atom,
    pub utf8_string: xlib::Atom,
    pub text: xlib::Atom,
    /// Property on our own window used as the landing pad for
    /// `XConvertSelection` replies.
    pub snarf_property: xlib::Atom,
    pub wm_protocols: xlib::Atom,
    pub wm_delete_window: xlib::Atom,
}

impl SnarfAtoms {
    pub fn new(connection: &Connection) -> Result<Self> {
        let display = connection.display();

        let intern = |name: &str| -> Result<xlib::Atom> {
            let name_cstr = std::ffi::CString::new(name)
                .with_context(|| format!("atom name '{}' contains a NUL byte", name))?;
            // SAFETY: FFI call; `display` is valid for the connection's
            // lifetime and the CString outlives the call.
            let atom = unsafe {
                xlib::XInternAtom(display, name_cstr.as_ptr() as *const c_char, xlib::False)
            };
            if atom == 0 {
                Err(anyhow!("failed to intern X11 atom: {}", name))
            } else {
                Ok(atom)
            }
        };

        Ok(Self {
            clipboard: intern("CLIPBOARD")?,
            targets: intern("TARGETS")?,
            utf8_string: intern("UTF8_STRING")?,
            text: intern("TEXT")?,
            snarf_property: intern("NINEDRAW_SNARF")?,
            wm_protocols: intern("WM_PROTOCOLS")?,
            wm_delete_window: intern("WM_DELETE_WINDOW")?,
        })
    }
}
