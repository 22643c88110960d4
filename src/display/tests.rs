// src/display/tests.rs

use super::*;
use crate::backend::headless::{CursorChange, HeadlessBackend};
use crate::cursor::Cursor;
use crate::keys::{KeySymbol, Modifiers, KEY_UP};

use std::cell::RefCell;
use std::rc::Rc;
use test_log::test;

/// Shared handle to a headless backend so a test can keep inspecting the
/// backend after handing it to the display.
#[derive(Clone)]
struct SharedHeadless(Rc<RefCell<HeadlessBackend>>);

impl SharedHeadless {
    fn new(width_px: u32, height_px: u32) -> Self {
        SharedHeadless(Rc::new(RefCell::new(HeadlessBackend::new(
            width_px, height_px,
        ))))
    }
}

impl WindowBackend for SharedHeadless {
    fn poll_events(&mut self) -> Result<Vec<WindowEvent>> {
        self.0.borrow_mut().poll_events()
    }
    fn upload(&mut self, pixels: &[u8], width_px: u32, height_px: u32) -> Result<()> {
        self.0.borrow_mut().upload(pixels, width_px, height_px)
    }
    fn publish(&mut self) -> Result<()> {
        self.0.borrow_mut().publish()
    }
    fn warp_pointer(&mut self, p: Point) -> Result<()> {
        self.0.borrow_mut().warp_pointer(p)
    }
    fn set_cursor(&mut self, cursor: Option<&Cursor>) -> Result<()> {
        self.0.borrow_mut().set_cursor(cursor)
    }
    fn read_clipboard(&mut self) -> Result<String> {
        self.0.borrow_mut().read_clipboard()
    }
    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        self.0.borrow_mut().write_clipboard(text)
    }
    fn send_close(&mut self) {
        self.0.borrow_mut().send_close()
    }
    fn size_px(&self) -> (u32, u32) {
        self.0.borrow().size_px()
    }
    fn scale_factor(&self) -> f64 {
        self.0.borrow().scale_factor()
    }
}

fn display_with_backend(width_px: u32, height_px: u32) -> (Display, SharedHeadless) {
    let backend = SharedHeadless::new(width_px, height_px);
    let display = Display::init(Box::new(backend.clone()), &DisplayConfig::default()).unwrap();
    (display, backend)
}

fn display_with_dpi(dpi: i32) -> Display {
    let config = DisplayConfig {
        dpi,
        ..DisplayConfig::default()
    };
    let backend = SharedHeadless::new(64, 64);
    Display::init(Box::new(backend), &config).unwrap()
}

// --- alloc_image ---

#[test]
fn it_should_return_a_uniform_image_for_1x1_replicated_allocations() {
    let (display, _) = display_with_backend(64, 64);
    let img = display
        .alloc_image(rect(0, 0, 1, 1), Pix::Rgba32, true, Color::RED)
        .unwrap();
    assert!(img.repl());
    assert_eq!(img.at(pt(0, 0)), Color::RED);
    // A uniform image answers far outside its nominal rectangle.
    assert_eq!(img.at(pt(12_345, -9_876)), Color::RED);
}

#[test]
fn it_should_materialize_solid_buffers_for_larger_allocations() {
    let (display, _) = display_with_backend(64, 64);
    let r = rect(0, 0, 5, 3);
    let img = display
        .alloc_image(r, Pix::Rgba32, true, Color::GREEN)
        .unwrap();
    assert!(!img.repl());
    for y in 0..3 {
        for x in 0..5 {
            assert_eq!(img.at(pt(x, y)), Color::GREEN);
        }
    }
}

#[test]
fn it_should_materialize_a_1x1_buffer_when_repl_is_not_requested() {
    let (display, _) = display_with_backend(64, 64);
    let img = display
        .alloc_image(rect(0, 0, 1, 1), Pix::Rgba32, false, Color::BLUE)
        .unwrap();
    assert!(!img.repl());
    assert_eq!(img.at(pt(0, 0)), Color::BLUE);
    assert_eq!(img.at(pt(2, 2)), Color::TRANSPARENT);
}

#[test]
fn it_should_prebuild_the_four_constant_brushes() {
    let (display, _) = display_with_backend(64, 64);
    assert_eq!(display.black.at(pt(77, 77)), Color::BLACK);
    assert_eq!(display.white.at(pt(-3, 0)), Color::WHITE);
    assert_eq!(display.opaque.at(pt(0, 0)), Color::OPAQUE);
    assert_eq!(display.transparent.at(pt(1, 1)), Color::TRANSPARENT);
    assert!(display.black.repl());
}

// --- scale_size ---

#[test]
fn scale_size_is_identity_at_baseline_dpi() {
    let display = display_with_dpi(100);
    for n in [-50, 0, 1, 7, 100, 12_345] {
        assert_eq!(display.scale_size(n), n);
    }
}

#[test]
fn scale_size_doubles_at_200_dpi() {
    let display = display_with_dpi(200);
    assert_eq!(display.scale_size(10), 20);
    assert_eq!(display.scale_size(1), 2);
}

#[test]
fn scale_size_rounds_to_nearest_at_150_dpi() {
    let display = display_with_dpi(150);
    assert_eq!(display.scale_size(100), 150);
    // 1 * 150 + 50 = 200; 200 / 100 = 2.
    assert_eq!(display.scale_size(1), 2);
    assert_eq!(display.scale_size(3), 5);
}

#[test]
fn scale_size_is_identity_below_baseline_dpi() {
    let display = display_with_dpi(72);
    assert_eq!(display.scale_size(10), 10);
}

#[test]
fn it_should_derive_dpi_from_the_backend_scale_factor_when_unset() {
    let backend = SharedHeadless::new(64, 64);
    backend.0.borrow_mut().set_scale_factor(2.0);
    let config = DisplayConfig {
        dpi: 0,
        ..DisplayConfig::default()
    };
    let display = Display::init(Box::new(backend), &config).unwrap();
    assert_eq!(display.dpi, 200);
    assert_eq!(display.scale_size(10), 20);
}

#[test]
fn it_should_fall_back_to_baseline_dpi_on_an_unscaled_backend() {
    let backend = SharedHeadless::new(64, 64);
    let config = DisplayConfig {
        dpi: 0,
        ..DisplayConfig::default()
    };
    let display = Display::init(Box::new(backend), &config).unwrap();
    assert_eq!(display.dpi, DEFAULT_DPI);
    assert_eq!(display.scale_size(7), 7);
}

// --- snarf ---

#[test]
fn it_should_report_truncation_when_the_snarf_buffer_is_too_short() {
    let (mut display, backend) = display_with_backend(64, 64);
    backend.0.borrow_mut().set_clipboard("hello");

    let mut buf = [0u8; 3];
    match display.read_snarf(&mut buf) {
        Err(SnarfError::BufferTooShort { copied, total }) => {
            assert_eq!(copied, 3);
            assert_eq!(total, 5);
        }
        other => panic!("expected BufferTooShort, got {:?}", other),
    }
    assert_eq!(&buf, b"hel");
}

#[test]
fn it_should_read_the_whole_snarf_buffer_when_it_fits() {
    let (mut display, backend) = display_with_backend(64, 64);
    backend.0.borrow_mut().set_clipboard("hi");

    let mut buf = [0u8; 10];
    let (written, total) = display.read_snarf(&mut buf).unwrap();
    assert_eq!((written, total), (2, 2));
    assert_eq!(&buf[..written], b"hi");
}

#[test]
fn it_should_propagate_clipboard_failures_unmodified() {
    let (mut display, backend) = display_with_backend(64, 64);
    backend.0.borrow_mut().set_clipboard("hello");
    backend.0.borrow_mut().break_clipboard();

    let mut buf = [0u8; 8];
    match display.read_snarf(&mut buf) {
        Err(SnarfError::Clipboard(source)) => {
            assert_eq!(source.to_string(), "clipboard unavailable");
        }
        other => panic!("expected a Clipboard error, got {:?}", other),
    }
    // A failed read writes nothing into the caller's buffer.
    assert_eq!(buf, [0u8; 8]);

    assert!(display.write_snarf(b"x").is_err());
}

#[test]
fn it_should_round_trip_write_snarf_to_read_snarf() {
    let (mut display, _) = display_with_backend(64, 64);
    display.write_snarf(b"x").unwrap();

    let mut buf = [0u8; 16];
    let (written, total) = display.read_snarf(&mut buf).unwrap();
    assert_eq!((written, total), (1, 1));
    assert_eq!(&buf[..1], b"x");
}

// --- flush / move_to / set_cursor / close ---

#[test]
fn it_should_upload_and_publish_the_screen_buffer_on_flush() {
    let (mut display, backend) = display_with_backend(2, 2);

    {
        let screen = display.screen_image();
        let mut buf = screen.lock().unwrap();
        buf.pixels[0] = 0xAB; // first pixel's red channel
    }
    display.flush().unwrap();

    let inner = backend.0.borrow();
    assert_eq!(inner.uploads().len(), 1);
    assert_eq!(inner.uploads()[0].len(), 2 * 2 * 4);
    assert_eq!(inner.uploads()[0][0], 0xAB);
    assert_eq!(inner.publish_count(), 1);
}

#[test]
fn it_should_warp_the_pointer_on_move_to() {
    let (mut display, backend) = display_with_backend(64, 64);
    display.move_to(pt(10, 20)).unwrap();
    assert_eq!(backend.0.borrow().warps(), &[pt(10, 20)]);
}

#[test]
fn it_should_install_and_reset_cursors() {
    let (mut display, backend) = display_with_backend(64, 64);

    let cursor = Cursor {
        offset: pt(-7, -7),
        ..Cursor::default()
    };
    display.set_cursor(Some(&cursor)).unwrap();
    display.set_cursor(None).unwrap();

    assert_eq!(
        backend.0.borrow().cursor_changes(),
        &[CursorChange::Custom(pt(-7, -7)), CursorChange::Default]
    );
}

#[test]
fn it_should_send_the_close_signal_without_blocking() {
    let (mut display, backend) = display_with_backend(64, 64);
    display.close().unwrap();
    assert_eq!(backend.0.borrow().close_signals(), 1);
}

#[test]
fn attach_and_set_debug_are_accepted_noops() {
    let (mut display, backend) = display_with_backend(64, 64);
    display.attach(Refresh::Backup).unwrap();
    display.attach(Refresh::None).unwrap();
    display.attach(Refresh::Message).unwrap();
    display.set_debug(true);
    display.set_debug(false);

    // Nothing reached the backend.
    let inner = backend.0.borrow();
    assert!(inner.uploads().is_empty());
    assert_eq!(inner.publish_count(), 0);
    assert_eq!(inner.close_signals(), 0);
}

// --- input channels ---

#[test]
fn it_should_return_the_same_mouse_wrapper_on_every_init_mouse_call() {
    let (display, _) = display_with_backend(64, 64);
    let first = display.init_mouse() as *const Mousectl;
    let second = display.init_mouse() as *const Mousectl;
    assert_eq!(first, second);
}

#[test]
fn it_should_translate_key_events_onto_the_keyboard_channel() {
    let (mut display, backend) = display_with_backend(64, 64);
    backend.0.borrow_mut().push_event(WindowEvent::Key {
        symbol: KeySymbol::Up,
        modifiers: Modifiers::empty(),
        text: None,
    });
    backend.0.borrow_mut().push_event(WindowEvent::Key {
        symbol: KeySymbol::Char('a'),
        modifiers: Modifiers::empty(),
        text: Some("a".to_string()),
    });
    display.pump_events().unwrap();

    let keyboard = display.init_keyboard();
    assert_eq!(keyboard.try_recv(), Some(KEY_UP));
    assert_eq!(keyboard.try_recv(), Some('a'));
    assert_eq!(keyboard.try_recv(), None);
}

#[test]
fn it_should_track_button_state_across_mouse_events() {
    let (mut display, backend) = display_with_backend(64, 64);
    {
        let mut inner = backend.0.borrow_mut();
        inner.push_event(WindowEvent::MouseButtonPress {
            button: 1,
            x: 5,
            y: 6,
            modifiers: Modifiers::empty(),
        });
        inner.push_event(WindowEvent::MouseMove {
            x: 8,
            y: 9,
            modifiers: Modifiers::empty(),
        });
        inner.push_event(WindowEvent::MouseButtonRelease {
            button: 1,
            x: 8,
            y: 9,
            modifiers: Modifiers::empty(),
        });
    }
    display.pump_events().unwrap();

    let mouse = display.init_mouse();
    let down = mouse.try_recv().unwrap();
    assert_eq!(down.xy, pt(5, 6));
    assert_eq!(down.buttons, Buttons::LEFT);

    let moved = mouse.try_recv().unwrap();
    assert_eq!(moved.xy, pt(8, 9));
    assert_eq!(moved.buttons, Buttons::LEFT);

    let up = mouse.try_recv().unwrap();
    assert_eq!(up.buttons, Buttons::empty());
}

#[test]
fn it_should_resize_the_screen_buffer_and_signal_the_resize_channel() {
    let (mut display, backend) = display_with_backend(64, 64);
    backend.0.borrow_mut().push_event(WindowEvent::Resize {
        width_px: 320,
        height_px: 200,
    });
    display.pump_events().unwrap();

    assert_eq!(display.init_mouse().resized(), Some((320, 200)));
    let bounds = display.screen_image().bounds().unwrap();
    assert_eq!(bounds, rect(0, 0, 320, 200));
    assert_eq!(
        display.screen_image().lock().unwrap().pixels.len(),
        320 * 200 * 4
    );
}

#[test]
fn it_should_latch_platform_close_requests() {
    let (mut display, backend) = display_with_backend(64, 64);
    assert!(!display.close_requested());
    backend
        .0
        .borrow_mut()
        .push_event(WindowEvent::CloseRequested);
    display.pump_events().unwrap();
    assert!(display.close_requested());
}
