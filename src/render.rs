//! Grid overlay painting.
//!
//! The overlay partitions the viewport into `N × N` cells and outlines each
//! cell twice: an outer outline in one color and an inner outline, inset by
//! the output scale factor, in another.  The two-tone border stays visible
//! on any background.
//!
//! Pixels are written into an ARGB8888 buffer (`wl_shm` format, little
//! endian, premultiplied alpha) through `tiny-skia` rectangle fills.

use crate::buffer::buffer_size;
use crate::grid::Viewport;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fmt;
use tiny_skia::{BlendMode, Paint, PixmapMut, Transform};

/// A straight-alpha color in `0xAARRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argb(pub u32);

impl Argb {
    pub const BLACK: Argb = Argb(0xff00_0000);
    pub const WHITE: Argb = Argb(0xffff_ffff);

    /// Parse `#AARRGGBB`, `#RRGGBB` (opaque) or the same without `#`.
    pub fn from_hex(s: &str) -> Option<Argb> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            8 => Some(Argb(value)),
            6 => Some(Argb(0xff00_0000 | value)),
            _ => None,
        }
    }

    fn channels(self) -> (u8, u8, u8, u8) {
        let [a, r, g, b] = self.0.to_be_bytes();
        (a, r, g, b)
    }

    /// tiny-skia writes RGBA byte order while ARGB8888 is BGRA in memory,
    /// so red and blue trade places here.
    fn to_skia(self) -> tiny_skia::Color {
        let (a, r, g, b) = self.channels();
        tiny_skia::Color::from_rgba8(b, g, r, a)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Argb::from_hex(&s).ok_or_else(|| {
            DeError::custom(format!("invalid color {:?}, expected \"#AARRGGBB\"", s))
        })
    }
}

/// How the grid looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Cells per side.
    pub grid_size: u32,
    pub outer_color: Argb,
    pub inner_color: Argb,
}

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The two outlines painted for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub outer: PixelRect,
    pub inner: PixelRect,
}

/// Lay out the grid cells for `viewport` on a `width × height` buffer.
///
/// Cell sizes are the buffer size divided by `grid_size`, scaled by the
/// viewport's fraction of the output; cells are offset by the viewport
/// origin.  The inner outline is inset by `scale` on every side.
pub fn cells(grid_size: u32, viewport: &Viewport, width: u32, height: u32, scale: i32) -> Vec<Cell> {
    let n = grid_size.max(1);
    let box_width = ((width / n) as f64 * viewport.width) as i32;
    let box_height = ((height / n) as f64 * viewport.height) as i32;
    let origin_x = (width as f64 * viewport.x) as i32;
    let origin_y = (height as f64 * viewport.y) as i32;

    let mut out = Vec::with_capacity((n * n) as usize);
    for col in 0..n as i32 {
        for row in 0..n as i32 {
            let outer = PixelRect {
                x: origin_x + col * box_width,
                y: origin_y + row * box_height,
                width: box_width,
                height: box_height,
            };
            let inner = PixelRect {
                x: outer.x + scale,
                y: outer.y + scale,
                width: box_width - 2 * scale,
                height: box_height - 2 * scale,
            };
            out.push(Cell { outer, inner });
        }
    }
    out
}

/// Errors from painting into a buffer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("buffer of {len} bytes does not hold {width}x{height} ARGB8888 pixels")]
    BadBuffer { len: usize, width: u32, height: u32 },
}

/// Clear `pixels` to transparent and paint the grid for `viewport`.
pub fn paint(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    scale: i32,
    viewport: &Viewport,
    style: &Style,
) -> Result<(), RenderError> {
    let len = pixels.len();
    if len != buffer_size(width, height) {
        return Err(RenderError::BadBuffer { len, width, height });
    }
    // Transparent is all zero bytes in premultiplied ARGB.
    pixels.fill(0);
    let mut pixmap = PixmapMut::from_bytes(pixels, width, height)
        .ok_or(RenderError::BadBuffer { len, width, height })?;

    let outer = solid(style.outer_color);
    let inner = solid(style.inner_color);
    for cell in cells(style.grid_size, viewport, width, height, scale) {
        outline(&mut pixmap, cell.outer, 1, &outer);
        outline(&mut pixmap, cell.inner, scale, &inner);
    }
    Ok(())
}

fn solid(color: Argb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = false;
    paint.blend_mode = BlendMode::Source;
    paint
}

fn outline(pixmap: &mut PixmapMut<'_>, r: PixelRect, stroke: i32, paint: &Paint<'_>) {
    fill(pixmap, r.x, r.y, r.width, stroke, paint);
    fill(pixmap, r.x, r.y, stroke, r.height, paint);
    fill(pixmap, r.x, r.y + r.height - stroke, r.width, stroke, paint);
    fill(pixmap, r.x + r.width - stroke, r.y, stroke, r.height, paint);
}

fn fill(pixmap: &mut PixmapMut<'_>, x: i32, y: i32, width: i32, height: i32, paint: &Paint<'_>) {
    if width <= 0 || height <= 0 {
        return;
    }
    if let Some(rect) =
        tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32)
    {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
}

//  Tests
