#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.

/// A point in surface-local CSS pixels (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `dist` pixels away along `angle` (radians, clockwise from +x
    /// since y grows downward).
    #[inline]
    #[must_use]
    pub fn along(self, angle: f64, dist: f64) -> Self {
        Self::new(self.x + dist * angle.cos(), self.y + dist * angle.sin())
    }
}

/// Top-left corner of the surface's bounding box in client coordinates, as
/// reported by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
}

impl SurfaceBounds {
    #[inline]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Translate a client-space pointer position into surface-local pixels.
    #[inline]
    pub fn to_local(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}
