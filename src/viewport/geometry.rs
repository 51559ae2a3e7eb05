//! Geometry primitives for pointer routing

use std::ops::{Add, Sub};

/// A point (or delta) in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply each axis by its own factor
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Ratio of rendered size to layout size along one axis
///
/// Degenerate geometry (zero, negative, or non-finite sizes) falls back to 1.0
/// so a collapsed element still drags instead of producing NaN/∞ offsets.
fn axis_ratio(rendered: f64, layout: f64) -> f64 {
    let ratio = rendered / layout;
    if rendered > 0.0 && layout > 0.0 && ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

/// Per-axis scale factors converting screen deltas into layout deltas
pub fn scale_ratio(rendered: Size, layout: Size) -> (f64, f64) {
    (
        axis_ratio(rendered.width, layout.width),
        axis_ratio(rendered.height, layout.height),
    )
}
