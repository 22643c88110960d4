// src/image.rs

//! The `Image` type handed to the toolkit by `Display::alloc_image`: either
//! a uniform (infinitely tileable) color, or a concretely sized RGBA buffer.
//!
//! The uniform case exists purely as a memory optimization for the common
//! "solid color brush" allocation, which toolkits request as a 1x1
//! rectangle with the replicate flag set. Everything else is materialized.

use crate::color::Color;
use crate::geom::{Point, Rectangle};

/// Pixel channel descriptor accepted by `alloc_image`.
///
/// Carried for contract parity with the abstract display interface; this
/// implementation always materializes RGBA32 regardless of the requested
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pix {
    Grey1,
    Grey8,
    Cmap8,
    Rgb16,
    Rgb24,
    #[default]
    Rgba32,
    Argb32,
    Xrgb32,
}

const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone)]
enum ImageData {
    /// One color answering for every point, inside or outside `r`.
    Uniform(Color),
    /// Row-major RGBA covering exactly `r`.
    Buffer { stride: usize, pixels: Vec<u8> },
}

/// An allocated image, exclusively owned by the display that created it.
#[derive(Debug, Clone)]
pub struct Image {
    /// The nominal rectangle of the image.
    pub r: Rectangle,
    /// The channel layout the caller asked for.
    pub pix: Pix,
    repl: bool,
    data: ImageData,
}

impl Image {
    /// Builds a uniform image: the color answers at every point, which is
    /// what makes a 1x1 replicated image an infinitely tileable brush.
    pub(crate) fn uniform(r: Rectangle, pix: Pix, color: Color) -> Self {
        Image {
            r,
            pix,
            repl: true,
            data: ImageData::Uniform(color),
        }
    }

    /// Builds a concretely sized buffer pre-filled with `color`.
    pub(crate) fn filled(r: Rectangle, pix: Pix, color: Color) -> Self {
        let width = r.dx().max(0) as usize;
        let height = r.dy().max(0) as usize;
        let stride = width * BYTES_PER_PIXEL;
        let (red, green, blue, alpha) = color.rgba();
        let mut pixels = vec![0u8; stride * height];
        for chunk in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk[0] = red;
            chunk[1] = green;
            chunk[2] = blue;
            chunk[3] = alpha;
        }
        Image {
            r,
            pix,
            repl: false,
            data: ImageData::Buffer { stride, pixels },
        }
    }

    /// Returns true if the image replicates (tiles) over the whole plane.
    #[inline]
    pub fn repl(&self) -> bool {
        self.repl
    }

    /// Reports the color at `p`.
    ///
    /// Uniform images answer with their fill color for any point, however
    /// far outside the nominal rectangle. Buffer images answer
    /// `Color::TRANSPARENT` for points outside their rectangle.
    pub fn at(&self, p: Point) -> Color {
        match &self.data {
            ImageData::Uniform(color) => *color,
            ImageData::Buffer { stride, pixels } => {
                if !self.r.contains(p) {
                    return Color::TRANSPARENT;
                }
                let local = p - self.r.min;
                let offset = local.y as usize * stride + local.x as usize * BYTES_PER_PIXEL;
                Color::from_rgba(
                    pixels[offset],
                    pixels[offset + 1],
                    pixels[offset + 2],
                    pixels[offset + 3],
                )
            }
        }
    }

    /// Raw pixel access for buffer-backed images. Uniform images have no
    /// backing store and return `None`.
    pub fn pixels(&self) -> Option<&[u8]> {
        match &self.data {
            ImageData::Uniform(_) => None,
            ImageData::Buffer { pixels, .. } => Some(pixels),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{pt, rect};

    #[test]
    fn uniform_image_answers_everywhere() {
        let img = Image::uniform(rect(0, 0, 1, 1), Pix::Rgba32, Color::PALE_YELLOW);
        assert!(img.repl());
        assert_eq!(img.at(pt(0, 0)), Color::PALE_YELLOW);
        assert_eq!(img.at(pt(500, -10_000)), Color::PALE_YELLOW);
        assert_eq!(img.at(pt(-1_000_000, 1_000_000)), Color::PALE_YELLOW);
    }

    #[test]
    fn filled_image_holds_the_color_at_every_pixel() {
        let r = rect(2, 3, 10, 8);
        let img = Image::filled(r, Pix::Rgba32, Color::GREY_BLUE);
        assert!(!img.repl());
        for y in r.min.y..r.max.y {
            for x in r.min.x..r.max.x {
                assert_eq!(img.at(pt(x, y)), Color::GREY_BLUE, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn filled_image_is_transparent_outside_its_rectangle() {
        let img = Image::filled(rect(0, 0, 4, 4), Pix::Rgba32, Color::RED);
        assert_eq!(img.at(pt(4, 0)), Color::TRANSPARENT);
        assert_eq!(img.at(pt(-1, 2)), Color::TRANSPARENT);
    }

    #[test]
    fn filled_image_backing_store_matches_dimensions() {
        let img = Image::filled(rect(0, 0, 3, 2), Pix::Rgba32, Color::BLACK);
        assert_eq!(img.pixels().unwrap().len(), 3 * 2 * 4);

        let brush = Image::uniform(rect(0, 0, 1, 1), Pix::Rgba32, Color::BLACK);
        assert!(brush.pixels().is_none());
    }
}
