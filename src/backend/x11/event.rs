// src/backend/x11/event.rs

//! Translation of native XEvents into `WindowEvent`s, plus the selection
//! traffic (serving requests for snarf text we own, receiving conversions
//! we asked for).

#![allow(non_snake_case)] // For X11 types

use super::connection::Connection;
use super::selection::SnarfAtoms;
use super::window::XWindow;
use crate::backend::WindowEvent;
use crate::keys::{KeySymbol, Modifiers};

use libc::{c_char, c_int, c_long, c_ulong, c_void};
use log::{trace, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::mem;
use std::ptr;
use x11::xlib;

/// What a single native event amounted to.
#[derive(Debug)]
pub(super) enum Translated {
    /// A toolkit-visible event.
    Event(WindowEvent),
    /// A SelectionNotify answering our own conversion request; `None`
    /// means the owner could not convert.
    SelectionDelivered(Option<String>),
    /// Another client took the CLIPBOARD selection from us.
    SelectionLost,
    /// Nothing the display layer cares about.
    Nothing,
}

static KEYSYM_TABLE: Lazy<HashMap<u32, KeySymbol>> = Lazy::new(|| {
    use x11::keysym::*;
    HashMap::from([
        (XK_BackSpace, KeySymbol::Backspace),
        (XK_Tab, KeySymbol::Tab),
        (XK_Return, KeySymbol::Enter),
        (XK_KP_Enter, KeySymbol::Enter),
        (XK_Escape, KeySymbol::Escape),
        (XK_Delete, KeySymbol::Delete),
        (XK_Home, KeySymbol::Home),
        (XK_End, KeySymbol::End),
        (XK_Left, KeySymbol::Left),
        (XK_Right, KeySymbol::Right),
        (XK_Up, KeySymbol::Up),
        (XK_Down, KeySymbol::Down),
        (XK_Page_Up, KeySymbol::PageUp),
        (XK_Page_Down, KeySymbol::PageDown),
        (XK_Insert, KeySymbol::Insert),
        (XK_Print, KeySymbol::PrintScreen),
        (XK_Menu, KeySymbol::Menu),
        (XK_F1, KeySymbol::F1),
        (XK_F2, KeySymbol::F2),
        (XK_F3, KeySymbol::F3),
        (XK_F4, KeySymbol::F4),
        (XK_F5, KeySymbol::F5),
        (XK_F6, KeySymbol::F6),
        (XK_F7, KeySymbol::F7),
        (XK_F8, KeySymbol::F8),
        (XK_F9, KeySymbol::F9),
        (XK_F10, KeySymbol::F10),
        (XK_F11, KeySymbol::F11),
        (XK_F12, KeySymbol::F12),
        (XK_Shift_L, KeySymbol::Shift),
        (XK_Shift_R, KeySymbol::Shift),
        (XK_Control_L, KeySymbol::Control),
        (XK_Control_R, KeySymbol::Control),
        (XK_Alt_L, KeySymbol::Alt),
        (XK_Alt_R, KeySymbol::Alt),
        (XK_Super_L, KeySymbol::Super),
        (XK_Super_R, KeySymbol::Super),
        (XK_Caps_Lock, KeySymbol::CapsLock),
        (XK_Num_Lock, KeySymbol::NumLock),
    ])
});

fn modifiers_from_state(state: u32) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if state & xlib::ShiftMask != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if state & xlib::ControlMask != 0 {
        modifiers |= Modifiers::CONTROL;
    }
    if state & xlib::Mod1Mask != 0 {
        modifiers |= Modifiers::ALT;
    }
    if state & xlib::Mod4Mask != 0 {
        modifiers |= Modifiers::SUPER;
    }
    if state & xlib::LockMask != 0 {
        modifiers |= Modifiers::CAPS_LOCK;
    }
    if state & xlib::Mod2Mask != 0 {
        modifiers |= Modifiers::NUM_LOCK;
    }
    modifiers
}

fn symbol_for_keysym(keysym: c_ulong, text: Option<&str>) -> KeySymbol {
    if let Some(symbol) = KEYSYM_TABLE.get(&(keysym as u32)) {
        return *symbol;
    }
    // Latin-1 keysyms coincide with their character codes.
    if keysym < 0x100 {
        return KeySymbol::Char(keysym as u8 as char);
    }
    match text.and_then(|t| t.chars().next()) {
        Some(c) => KeySymbol::Char(c),
        None => KeySymbol::Unknown,
    }
}

/// Translates one native event. Selection requests for snarf text we own
/// are answered here; everything else is mapped or dropped.
pub(super) fn translate_xevent(
    connection: &Connection,
    window: &mut XWindow,
    atoms: &SnarfAtoms,
    owned_snarf: Option<&str>,
    xevent: &mut xlib::XEvent,
) -> Translated {
    let display = connection.display();
    // SAFETY: the union accesses below match the event type tag.
    let event_type = unsafe { xevent.type_ };
    match event_type {
        xlib::KeyPress => {
            let mut key_event = unsafe { xevent.key };
            let mut keysym: xlib::KeySym = 0;
            let mut buffer = [0u8; 32];
            // SAFETY: FFI; buffer and keysym are valid out-pointers.
            let count = unsafe {
                xlib::XLookupString(
                    &mut key_event,
                    buffer.as_mut_ptr() as *mut c_char,
                    buffer.len() as c_int,
                    &mut keysym,
                    ptr::null_mut(),
                )
            };
            let text = if count > 0 {
                Some(String::from_utf8_lossy(&buffer[..count as usize]).into_owned())
            } else {
                None
            };
            Translated::Event(WindowEvent::Key {
                symbol: symbol_for_keysym(keysym, text.as_deref()),
                modifiers: modifiers_from_state(key_event.state),
                text,
            })
        }
        xlib::ButtonPress => {
            let button_event = unsafe { xevent.button };
            Translated::Event(WindowEvent::MouseButtonPress {
                button: button_event.button as u8,
                x: button_event.x,
                y: button_event.y,
                modifiers: modifiers_from_state(button_event.state),
            })
        }
        xlib::ButtonRelease => {
            let button_event = unsafe { xevent.button };
            Translated::Event(WindowEvent::MouseButtonRelease {
                button: button_event.button as u8,
                x: button_event.x,
                y: button_event.y,
                modifiers: modifiers_from_state(button_event.state),
            })
        }
        xlib::MotionNotify => {
            let motion_event = unsafe { xevent.motion };
            Translated::Event(WindowEvent::MouseMove {
                x: motion_event.x,
                y: motion_event.y,
                modifiers: modifiers_from_state(motion_event.state),
            })
        }
        xlib::ConfigureNotify => {
            let configure = unsafe { xevent.configure };
            let width_px = configure.width.max(0) as u32;
            let height_px = configure.height.max(0) as u32;
            if window.update_size(width_px, height_px) {
                Translated::Event(WindowEvent::Resize {
                    width_px,
                    height_px,
                })
            } else {
                Translated::Nothing
            }
        }
        xlib::FocusIn => Translated::Event(WindowEvent::FocusGained),
        xlib::FocusOut => Translated::Event(WindowEvent::FocusLost),
        xlib::ClientMessage => {
            let message = unsafe { xevent.client_message };
            if message.message_type == atoms.wm_protocols
                && message.data.get_long(0) as xlib::Atom == atoms.wm_delete_window
            {
                Translated::Event(WindowEvent::CloseRequested)
            } else {
                Translated::Nothing
            }
        }
        xlib::SelectionClear => {
            let clear = unsafe { xevent.selection_clear };
            if clear.selection == atoms.clipboard {
                trace!("lost CLIPBOARD selection ownership");
                Translated::SelectionLost
            } else {
                Translated::Nothing
            }
        }
        xlib::SelectionRequest => {
            let request = unsafe { xevent.selection_request };
            serve_selection_request(display, window, atoms, owned_snarf, &request);
            Translated::Nothing
        }
        xlib::SelectionNotify => {
            let notify = unsafe { xevent.selection };
            if notify.requestor != window.id() {
                return Translated::Nothing;
            }
            if notify.property == 0 {
                // The owner could not convert to the requested target.
                return Translated::SelectionDelivered(None);
            }
            Translated::SelectionDelivered(fetch_selection_property(
                display,
                window.id(),
                notify.property,
            ))
        }
        _ => {
            trace!("ignoring X event type {}", event_type);
            Translated::Nothing
        }
    }
}

/// Answers a SelectionRequest for snarf text we own, or refuses it with a
/// property of None.
fn serve_selection_request(
    display: *mut xlib::Display,
    window: &XWindow,
    atoms: &SnarfAtoms,
    owned_snarf: Option<&str>,
    request: &xlib::XSelectionRequestEvent,
) {
    // SAFETY: FFI; the response event is fully initialized.
    let mut response: xlib::XSelectionEvent = unsafe { mem::zeroed() };
    response.type_ = xlib::SelectionNotify;
    response.display = request.display;
    response.requestor = request.requestor;
    response.selection = request.selection;
    response.target = request.target;
    response.time = request.time;
    response.property = 0; // refused until proven convertible

    if request.owner == window.id() {
        if let Some(text) = owned_snarf {
            if request.target == atoms.utf8_string
                || request.target == atoms.text
                || request.target == xlib::XA_STRING
            {
                // SAFETY: FFI; the text buffer outlives the call.
                unsafe {
                    xlib::XChangeProperty(
                        display,
                        request.requestor,
                        request.property,
                        request.target,
                        8,
                        xlib::PropModeReplace,
                        text.as_ptr(),
                        text.len() as c_int,
                    );
                }
                response.property = request.property;
            } else if request.target == atoms.targets {
                let mut supported: Vec<xlib::Atom> =
                    vec![atoms.targets, atoms.utf8_string, atoms.text, xlib::XA_STRING];
                // SAFETY: FFI; the atom array outlives the call.
                unsafe {
                    xlib::XChangeProperty(
                        display,
                        request.requestor,
                        request.property,
                        xlib::XA_ATOM,
                        32,
                        xlib::PropModeReplace,
                        supported.as_mut_ptr() as *mut u8,
                        supported.len() as c_int,
                    );
                }
                response.property = request.property;
            } else {
                trace!(
                    "refusing selection request for unsupported target {}",
                    request.target
                );
            }
        } else {
            warn!("selection request arrived but no snarf text is owned");
        }
    }

    // SAFETY: FFI; notify the requestor either way.
    unsafe {
        xlib::XSendEvent(
            display,
            request.requestor,
            xlib::False,
            xlib::NoEventMask,
            &mut response as *mut xlib::XSelectionEvent as *mut xlib::XEvent,
        );
        xlib::XFlush(display);
    }
}

/// Reads (and deletes) the property a selection conversion was delivered
/// to, decoding it as UTF-8 text.
fn fetch_selection_property(
    display: *mut xlib::Display,
    requestor: xlib::Window,
    property: xlib::Atom,
) -> Option<String> {
    let mut actual_type: xlib::Atom = 0;
    let mut actual_format: c_int = 0;
    let mut item_count: c_ulong = 0;
    let mut bytes_after: c_ulong = 0;
    let mut data: *mut u8 = ptr::null_mut();

    // SAFETY: FFI; all out-pointers are valid.
    let status = unsafe {
        xlib::XGetWindowProperty(
            display,
            requestor,
            property,
            0,
            c_long::MAX,
            xlib::True, // delete after fetching
            xlib::AnyPropertyType as xlib::Atom,
            &mut actual_type,
            &mut actual_format,
            &mut item_count,
            &mut bytes_after,
            &mut data,
        )
    };

    if status != xlib::Success as c_int || data.is_null() {
        warn!("XGetWindowProperty failed reading selection data");
        return None;
    }

    let text = if actual_format == 8 && item_count > 0 {
        // SAFETY: Xlib allocated item_count bytes at `data`.
        let bytes = unsafe { std::slice::from_raw_parts(data, item_count as usize) };
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else if item_count == 0 {
        Some(String::new())
    } else {
        warn!(
            "selection data arrived in unexpected format {} ({} items)",
            actual_format, item_count
        );
        None
    };

    // SAFETY: `data` came from XGetWindowProperty.
    unsafe { xlib::XFree(data as *mut c_void) };
    text
}
