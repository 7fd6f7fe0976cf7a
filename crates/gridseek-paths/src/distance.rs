use gridseek_core::Point;

use crate::cost::Cost;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    let d = a.abs_diff(b);
    d.x + d.y
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    let d = a.abs_diff(b);
    d.x.max(d.y)
}

/// Octile distance: straight steps cost 1 and diagonal steps 1.4.
///
/// With `m = max(dx, dy)` and `d = |dx - dy|` this is `d + (m - d) * 1.4`.
#[inline]
pub fn octile(a: Point, b: Point) -> Cost {
    let delta = a.abs_diff(b);
    let m = delta.x.max(delta.y);
    let d = (delta.x - delta.y).abs();
    Cost::STRAIGHT * d + Cost::DIAGONAL * (m - d)
}
