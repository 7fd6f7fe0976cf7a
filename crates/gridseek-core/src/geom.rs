//! Geometry primitives: [`Point`] and [`Range`].
//!
//! Grid positions are integer points. `x` indexes columns and `y` rows, so a
//! grid of `width x height` cells spans the range `[(0, 0), (width, height))`.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell position on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Per-axis absolute difference to `other`.
    #[inline]
    pub const fn abs_diff(self, other: Point) -> Point {
        Self {
            x: (self.x - other.x).abs(),
            y: (self.y - other.y).abs(),
        }
    }

    /// Whether moving from `self` to `other` changes exactly one axis.
    #[inline]
    pub const fn is_axis_aligned_with(self, other: Point) -> bool {
        (self.x != other.x) != (self.y != other.y)
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    /// Row-major order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Create a new range from two corners, canonicalized so that
    /// `min` <= `max` on each axis.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Range covering a `width x height` grid anchored at the origin.
    #[inline]
    pub fn of_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width.max(0), height.max(0))
    }

    /// Size as a `Point` (x = width, y = height).
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Row-major iterator over every point in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// RangeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: Point,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.range.max.x {
            self.cur.x = self.range.min.x;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let in_row = (self.range.max.x - self.cur.x) as usize;
        let rows = (self.range.max.y - self.cur.y - 1) as usize;
        let total = in_row + rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}
