use gridseek_core::Point;

/// The four axis-aligned offsets, column-major.
const CARDINAL: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(0, -1),
    Point::new(0, 1),
    Point::new(1, 0),
];

/// All eight offsets (cardinal + diagonal), column-major.
const ALL: [Point; 8] = [
    Point::new(-1, -1),
    Point::new(-1, 0),
    Point::new(-1, 1),
    Point::new(0, -1),
    Point::new(0, 1),
    Point::new(1, -1),
    Point::new(1, 0),
    Point::new(1, 1),
];

/// Lazy iterator over the positions adjacent to a cell.
///
/// Yields 4 cardinal positions, or all 8 when diagonals are enabled. No
/// bounds or occupancy filtering is applied; callers decide which positions
/// are usable.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Point,
    offsets: std::slice::Iter<'static, Point>,
}

impl Neighbors {
    /// Neighbors of `center`, including diagonals if `diagonals` is true.
    pub fn new(center: Point, diagonals: bool) -> Self {
        let offsets: &'static [Point] = if diagonals { &ALL } else { &CARDINAL };
        Self {
            center,
            offsets: offsets.iter(),
        }
    }

    /// The 4 axis-aligned neighbors of `center`.
    pub fn cardinal(center: Point) -> Self {
        Self::new(center, false)
    }

    /// All 8 neighbors of `center`.
    pub fn all(center: Point) -> Self {
        Self::new(center, true)
    }
}

impl Iterator for Neighbors {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        self.offsets.next().map(|&d| self.center + d)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl ExactSizeIterator for Neighbors {}
