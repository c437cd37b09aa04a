#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are CSS pixels in the host's client space (origin at the
//! top-left, `y` growing downwards). Values are `f64` because pointer input
//! and measured element boxes are fractional.

use serde::{Deserialize, Serialize};

/// A point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    #[inline]
    pub fn delta_from(self, origin: Point) -> Vector {
        Vector::new(self.x - origin.x, self.y - origin.y)
    }

    /// Translate by a vector.
    #[inline]
    pub fn offset(self, by: Vector) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    /// Component along an axis.
    #[inline]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// A two-dimensional displacement or velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along an axis.
    #[inline]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Keep only the component along `axis`, zeroing the other one.
    #[inline]
    pub const fn project(self, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::new(self.x, 0.0),
            Axis::Vertical => Self::new(0.0, self.y),
        }
    }

    /// Multiply both components by `factor`.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along an axis.
    #[inline]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// An axis-aligned rectangle: element bounding boxes, drop targets, panels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Position of `point` as a fraction of this rectangle in each axis.
    ///
    /// Returns `None` for empty rectangles.
    pub fn fraction_of(&self, point: Point) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            (point.x - self.x) / self.width,
            (point.y - self.y) / self.height,
        ))
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by the given margin on each side, never below zero size.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.left - margin.right).max(0.0),
            height: (self.height - margin.top - margin.bottom).max(0.0),
        }
    }

    /// Split along `axis` at `first_extent`, returning the two halves.
    pub fn split_at(&self, axis: Axis, first_extent: f64) -> (Rect, Rect) {
        match axis {
            Axis::Horizontal => {
                let first = first_extent.clamp(0.0, self.width);
                (
                    Rect::new(self.x, self.y, first, self.height),
                    Rect::new(self.x + first, self.y, self.width - first, self.height),
                )
            }
            Axis::Vertical => {
                let first = first_extent.clamp(0.0, self.height);
                (
                    Rect::new(self.x, self.y, self.width, first),
                    Rect::new(self.x, self.y + first, self.width, self.height - first),
                )
            }
        }
    }
}

/// Per-side lengths (margins, insets).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Same length on every side.
    pub const fn all(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Point, Rect, Sides, Vector};

    #[test]
    fn rect_contains_is_right_bottom_exclusive() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.9, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn rect_intersection_and_union() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2.0, 2.0, 2.0, 2.0)));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 6.0, 6.0));
        assert_eq!(a.intersection_opt(&Rect::new(5.0, 5.0, 1.0, 1.0)), None);
    }

    #[test]
    fn rect_inner_never_negative() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.inner(Sides::all(2.0)), Rect::new(2.0, 2.0, 6.0, 6.0));
        assert!(rect.inner(Sides::all(8.0)).is_empty());
    }

    #[test]
    fn fraction_of_empty_rect_is_none() {
        assert_eq!(Rect::default().fraction_of(Point::ZERO), None);
        let rect = Rect::new(100.0, 0.0, 200.0, 100.0);
        assert_eq!(rect.fraction_of(Point::new(150.0, 25.0)), Some((0.25, 0.25)));
    }

    #[test]
    fn split_at_clamps_extent() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (a, b) = rect.split_at(Axis::Horizontal, 130.0);
        assert_eq!(a.width, 100.0);
        assert_eq!(b.width, 0.0);
        let (top, bottom) = rect.split_at(Axis::Vertical, 20.0);
        assert_eq!(top, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(bottom, Rect::new(0.0, 20.0, 100.0, 30.0));
    }

    #[test]
    fn vector_projection_keeps_one_axis() {
        let v = Vector::new(3.0, -4.0);
        assert_eq!(v.project(Axis::Horizontal), Vector::new(3.0, 0.0));
        assert_eq!(v.project(Axis::Vertical), Vector::new(0.0, -4.0));
        assert_eq!(v.length(), 5.0);
    }
}
