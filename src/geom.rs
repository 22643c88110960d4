// src/geom.rs

//! Integer points and half-open rectangles.
//!
//! Rectangles span `min.x <= x < max.x` and `min.y <= y < max.y`; the
//! constructors canonicalize so `min` is always the upper-left corner.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in window coordinates, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Shorthand constructor for [`Point`].
pub const fn pt(x: i32, y: i32) -> Point {
    Point { x, y }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        pt(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        pt(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A half-open rectangle: `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

/// Builds a canonical rectangle from two corners given as coordinates.
pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
    Rectangle {
        min: pt(x0.min(x1), y0.min(y1)),
        max: pt(x0.max(x1), y0.max(y1)),
    }
}

impl Rectangle {
    /// Width in pixels.
    pub fn dx(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    pub fn dy(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// True when `p` lies inside; points on `max` edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_canonicalize_swapped_corners() {
        let r = rect(10, 8, 2, 3);
        assert_eq!(r.min, pt(2, 3));
        assert_eq!(r.max, pt(10, 8));
        assert_eq!(r.dx(), 8);
        assert_eq!(r.dy(), 5);
    }

    #[test]
    fn it_should_exclude_the_max_edges_from_containment() {
        let r = rect(0, 0, 4, 4);
        assert!(r.contains(pt(0, 0)));
        assert!(r.contains(pt(3, 3)));
        assert!(!r.contains(pt(4, 3)));
        assert!(!r.contains(pt(3, 4)));
        assert!(!r.contains(pt(-1, 0)));
    }

    #[test]
    fn it_should_report_degenerate_rectangles_as_empty() {
        assert!(rect(5, 5, 5, 9).is_empty());
        assert!(rect(3, 3, 3, 3).is_empty());
        assert!(!rect(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn it_should_add_and_subtract_points_componentwise() {
        assert_eq!(pt(3, 4) + pt(-1, 2), pt(2, 6));
        assert_eq!(pt(3, 4) - pt(1, 1), pt(2, 3));
    }
}
