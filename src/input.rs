// src/input.rs

//! Mouse and keyboard channel wrappers handed to the embedding toolkit.
//!
//! A display owns exactly one `Mousectl` and one `Keyboardctl`;
//! `Display::init_mouse` / `init_keyboard` return references to them
//! rather than allocating per call. The sending halves stay inside the
//! display and are fed by `Display::pump_events`, which the toolkit drives
//! from its own event loop.

use crate::geom::Point;
use anyhow::{anyhow, Result};
use bitflags::bitflags;
use std::sync::mpsc::{channel, Receiver, Sender};

bitflags! {
    /// The mouse button word: bit 0 is the left button, bit 1 the middle,
    /// bit 2 the right, bits 3 and 4 the scroll wheel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u32 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
        const SCROLL_UP = 1 << 3;
        const SCROLL_DOWN = 1 << 4;
    }
}

/// One mouse state: position, held buttons, and a millisecond timestamp
/// measured from display initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mouse {
    pub xy: Point,
    pub buttons: Buttons,
    pub msec: u32,
}

/// The display's mouse event source.
#[derive(Debug)]
pub struct Mousectl {
    mouse_rx: Receiver<Mouse>,
    resize_rx: Receiver<(u32, u32)>,
}

impl Mousectl {
    /// Blocks for the next mouse state.
    pub fn recv(&self) -> Result<Mouse> {
        self.mouse_rx
            .recv()
            .map_err(|_| anyhow!("mouse channel closed"))
    }

    /// Returns the next mouse state if one is queued.
    pub fn try_recv(&self) -> Option<Mouse> {
        self.mouse_rx.try_recv().ok()
    }

    /// Returns the most recent window resize, if one happened since the
    /// last call. Dimensions are pixels.
    pub fn resized(&self) -> Option<(u32, u32)> {
        let mut latest = None;
        while let Ok(size) = self.resize_rx.try_recv() {
            latest = Some(size);
        }
        latest
    }
}

/// The display's keyboard event source, delivering translated runes.
#[derive(Debug)]
pub struct Keyboardctl {
    rune_rx: Receiver<char>,
}

impl Keyboardctl {
    /// Blocks for the next rune.
    pub fn recv(&self) -> Result<char> {
        self.rune_rx
            .recv()
            .map_err(|_| anyhow!("keyboard channel closed"))
    }

    /// Returns the next rune if one is queued.
    pub fn try_recv(&self) -> Option<char> {
        self.rune_rx.try_recv().ok()
    }
}

/// Builds the mouse wrapper plus the sending halves kept by the display.
pub(crate) fn mouse_channel() -> (Mousectl, Sender<Mouse>, Sender<(u32, u32)>) {
    let (mouse_tx, mouse_rx) = channel();
    let (resize_tx, resize_rx) = channel();
    (
        Mousectl {
            mouse_rx,
            resize_rx,
        },
        mouse_tx,
        resize_tx,
    )
}

/// Builds the keyboard wrapper plus the sending half kept by the display.
pub(crate) fn keyboard_channel() -> (Keyboardctl, Sender<char>) {
    let (rune_tx, rune_rx) = channel();
    (Keyboardctl { rune_rx }, rune_tx)
}
