//! Normalized viewport geometry.
//!
//! The [`Viewport`] is the sub-rectangle of the output that the grid overlay
//! currently represents, expressed in normalized coordinates where the whole
//! output is `(0, 0, 1, 1)`.  Narrowing keeps one half of the rectangle;
//! panning shifts it by a fraction of its own size.
//!
//! Narrowing from the full rectangle never leaves `[0, 1]²`.  Panning is not
//! clamped and may push the viewport partly or fully off the output.

use crate::command::Direction;

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A rectangle in normalized output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

impl Viewport {
    /// The whole output.
    pub const FULL: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Keep the half of the viewport on the `direction` side.
    pub fn narrow(mut self, direction: Direction) -> Viewport {
        match direction {
            Direction::Left => {
                self.width *= 0.5;
            }
            Direction::Right => {
                self.x += self.width * 0.5;
                self.width *= 0.5;
            }
            Direction::Up => {
                self.height *= 0.5;
            }
            Direction::Down => {
                self.y += self.height * 0.5;
                self.height *= 0.5;
            }
        }
        self
    }

    /// Shift the viewport by `step` times its own width or height.
    pub fn pan(mut self, direction: Direction, step: f64) -> Viewport {
        match direction {
            Direction::Left => self.x -= self.width * step,
            Direction::Right => self.x += self.width * step,
            Direction::Up => self.y -= self.height * step,
            Direction::Down => self.y += self.height * step,
        }
        self
    }

    /// Center of the viewport in normalized coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Center of the viewport mapped onto an output of `width × height`.
    pub fn center_on(&self, width: u32, height: u32) -> Point {
        let (cx, cy) = self.center();
        Point {
            x: width as f64 * cx,
            y: height as f64 * cy,
        }
    }

    /// Whether the viewport lies entirely inside the output.
    pub fn is_within_bounds(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.x + self.width <= 1.0
            && self.y + self.height <= 1.0
    }
}

//  Tests
