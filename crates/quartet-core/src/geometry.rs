#![forbid(unsafe_code)]

//! Geometric primitives in host pixel space.
//!
//! Coordinates are `f32` with the origin at the top-left of the board.

use serde::{Deserialize, Serialize};

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`.
    #[inline]
    #[must_use]
    pub fn offset_from(self, origin: Point) -> Offset {
        Offset::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// True when either axis moved strictly more than `threshold`.
    #[inline]
    #[must_use]
    pub fn exceeds(self, threshold: f32) -> bool {
        self.dx.abs() > threshold || self.dy.abs() > threshold
    }

    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: left and top edges are inside, right and
    /// bottom are not.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translation that moves `self`'s origin onto `other`'s origin.
    #[inline]
    #[must_use]
    pub fn offset_to(&self, other: &Rect) -> Offset {
        other.origin().offset_from(self.origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.9, 29.9)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(15.0, 30.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn edges() {
        let r = Rect::new(5.0, 6.0, 10.0, 4.0);
        assert_eq!(r.left(), 5.0);
        assert_eq!(r.top(), 6.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 10.0);
        assert!(!r.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn offset_threshold_is_strict_per_axis() {
        assert!(!Offset::new(6.0, 6.0).exceeds(6.0));
        assert!(Offset::new(6.5, 0.0).exceeds(6.0));
        assert!(Offset::new(0.0, -7.0).exceeds(6.0));
    }

    #[test]
    fn offset_between_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(30.0, -5.0, 10.0, 10.0);
        assert_eq!(a.offset_to(&b), Offset::new(30.0, -5.0));
        assert_eq!(b.offset_to(&a), Offset::new(-30.0, 5.0));
        assert!(a.offset_to(&a).is_zero());
    }
}
