//! # Rasterizer
//!
//! Turns stroke geometry into pixels and pixels into an exportable image.
//!
//! ## Ink model
//!
//! The canvas is an 8-bit grayscale bitmap, white background, black ink. The
//! pen is [`PEN_WIDTH`] pixels wide with round caps: a pixel is inked when its
//! centre lies within half a pen width of the segment being drawn. Ink is
//! binary (no blending), so painting the same segment twice, or painting
//! segments in a different order, yields the same bitmap. Incremental drawing
//! during capture and a full clear-and-replay therefore always agree.
//!
//! ## Export format
//!
//! | Part        | Content                                          |
//! |-------------|--------------------------------------------------|
//! | File header | `BM`, total size, pixel-array offset             |
//! | DIB header  | 40-byte `BITMAPINFOHEADER`, 8 bpp, uncompressed  |
//! | Palette     | 256 gray entries (`i, i, i, 0`)                  |
//! | Pixel array | bottom-up rows, each padded to 4 bytes           |
//!
//! wrapped as `data:image/bmp;base64,...`, which browsers and PDF renderers
//! accept verbatim.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::stroke::{Point, Stroke};

/// Pen width in pixels.
pub const PEN_WIDTH: f32 = 2.0;

const INK: u8 = 0;
const PAPER: u8 = 255;

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 256 * 4;
/// 72 DPI expressed in pixels per metre.
const PIXELS_PER_METRE: i32 = 2835;

pub const DATA_URI_PREFIX: &str = "data:image/bmp;base64,";

/// Largest supported width or height, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// Pixel dimensions of a signature pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// `true` when both sides are within [`MAX_CANVAS_SIDE`].
    pub fn is_supported(&self) -> bool {
        self.width <= MAX_CANVAS_SIDE && self.height <= MAX_CANVAS_SIDE
    }

    fn clamped(self) -> Self {
        Self {
            width: self.width.min(MAX_CANVAS_SIDE),
            height: self.height.min(MAX_CANVAS_SIDE),
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 500,
            height: 160,
        }
    }
}

/// An always-valid drawing surface. Sides beyond [`MAX_CANVAS_SIDE`] are
/// clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: CanvasSize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> Self {
        let size = size.clamped();
        let len = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![PAPER; len],
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn clear(&mut self) {
        self.pixels.fill(PAPER);
    }

    /// Number of inked pixels.
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == INK).count()
    }

    pub fn is_blank(&self) -> bool {
        self.ink_count() == 0
    }

    pub fn is_inked(&self, x: u32, y: u32) -> bool {
        x < self.size.width
            && y < self.size.height
            && self.pixels[y as usize * self.size.width as usize + x as usize] == INK
    }

    /// Ink a single pen dab at `p`.
    pub fn draw_dot(&mut self, p: Point) {
        self.draw_segment(p, p);
    }

    /// Ink the capsule of radius `PEN_WIDTH / 2` around the segment `a`–`b`.
    ///
    /// Coordinates outside the canvas are clipped; non-finite coordinates
    /// draw nothing.
    pub fn draw_segment(&mut self, a: Point, b: Point) {
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return;
        }
        if self.size.width == 0 || self.size.height == 0 {
            return;
        }
        let radius = PEN_WIDTH / 2.0;

        let max_x = self.size.width as i64 - 1;
        let max_y = self.size.height as i64 - 1;
        let x0 = ((a.x.min(b.x) - radius).floor() as i64).clamp(0, max_x);
        let x1 = ((a.x.max(b.x) + radius).ceil() as i64).clamp(0, max_x);
        let y0 = ((a.y.min(b.y) - radius).floor() as i64).clamp(0, max_y);
        let y1 = ((a.y.max(b.y) + radius).ceil() as i64).clamp(0, max_y);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let centre = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_to_segment(centre, a, b) <= radius {
                    let idx = py as usize * self.size.width as usize + px as usize;
                    self.pixels[idx] = INK;
                }
            }
        }
    }

    /// Paint one committed stroke. A single-point stroke is a dot.
    pub fn draw_stroke(&mut self, stroke: &Stroke) {
        match stroke.points() {
            [] => {}
            [only] => self.draw_dot(*only),
            _ => {
                for (a, b) in stroke.segments() {
                    self.draw_segment(a, b);
                }
            }
        }
    }

    /// Clear, then paint every stroke in order.
    pub fn replay(&mut self, strokes: &[Stroke]) {
        self.clear();
        for stroke in strokes {
            self.draw_stroke(stroke);
        }
    }

    /// Encode the canvas as an 8-bit paletted BMP.
    pub fn to_bmp(&self) -> Vec<u8> {
        let width = self.size.width;
        let height = self.size.height;
        let row_len = (width + 3) & !3;
        let image_len = row_len * height;
        let offset = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;
        let file_len = offset + image_len;

        let mut out = Vec::with_capacity(file_len as usize);

        // File header
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_len.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());

        // BITMAPINFOHEADER (positive height = bottom-up rows)
        out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        out.extend_from_slice(&(width as i32).to_le_bytes());
        out.extend_from_slice(&(height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&image_len.to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&256u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        for level in 0..=255u8 {
            out.extend_from_slice(&[level, level, level, 0]);
        }

        let padding = (row_len - width) as usize;
        for y in (0..height).rev() {
            let start = y as usize * width as usize;
            out.extend_from_slice(&self.pixels[start..start + width as usize]);
            out.extend(std::iter::repeat(0u8).take(padding));
        }

        out
    }

    /// The self-describing export consumed downstream.
    pub fn to_data_uri(&self) -> String {
        format!("{DATA_URI_PREFIX}{}", STANDARD.encode(self.to_bmp()))
    }
}

/// Render `strokes` onto a fresh canvas of `size`.
pub fn rasterize(strokes: &[Stroke], size: CanvasSize) -> Canvas {
    let mut canvas = Canvas::new(size);
    canvas.replay(strokes);
    canvas
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
