//! The [`OccupancyGrid`] type: a fixed-size 2D grid of [`CellState`]s with
//! optional Start and End endpoints.
//!
//! The grid keeps the endpoint markers in the cells and the endpoint
//! positions in sync: placing a new Start frees the old Start cell, and
//! overwriting an endpoint cell with an obstacle forgets the endpoint.

use crate::cell::CellState;
use crate::geom::{Point, Range};

/// A 2D occupancy grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
    start: Option<Point>,
    end: Option<Point>,
}

impl OccupancyGrid {
    /// Create a new grid of the given dimensions with every cell free.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![CellState::Free; (width as usize) * (height as usize)],
            start: None,
            end: None,
        }
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// The bounding range of the grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::of_size(self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// The state of the cell at `p`, or `None` if `p` is outside the grid.
    pub fn at(&self, p: Point) -> Option<CellState> {
        self.index(p).and_then(|i| self.cells.get(i).copied())
    }

    /// Whether `p` is inside the grid and traversable.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(CellState::is_passable)
    }

    /// Set the cell at `p` and return its previous state. No-op (returning
    /// `None`) if `p` is outside the grid.
    ///
    /// Writing `Start` or `End` moves that endpoint here. Overwriting an
    /// endpoint cell with another state clears the endpoint.
    pub fn set(&mut self, p: Point, state: CellState) -> Option<CellState> {
        match state {
            CellState::Start => return self.set_start(p),
            CellState::End => return self.set_end(p),
            _ => {}
        }
        let prev = self.write(p, state)?;
        if self.start == Some(p) {
            self.start = None;
        }
        if self.end == Some(p) {
            self.end = None;
        }
        Some(prev)
    }

    /// Move the Start endpoint to `p`, returning the previous state of `p`.
    ///
    /// The old Start cell is released. Start may share a cell with End; the
    /// cell then shows whichever endpoint was placed last.
    pub fn set_start(&mut self, p: Point) -> Option<CellState> {
        if !self.contains(p) {
            return None;
        }
        self.clear_start();
        let prev = self.write(p, CellState::Start)?;
        self.start = Some(p);
        Some(prev)
    }

    /// Move the End endpoint to `p`, returning the previous state of `p`.
    ///
    /// The old End cell is released. End may share a cell with Start.
    pub fn set_end(&mut self, p: Point) -> Option<CellState> {
        if !self.contains(p) {
            return None;
        }
        self.clear_end();
        let prev = self.write(p, CellState::End)?;
        self.end = Some(p);
        Some(prev)
    }

    /// Remove the Start endpoint, releasing its cell.
    pub fn clear_start(&mut self) {
        if let Some(s) = self.start.take() {
            self.release(s);
        }
    }

    /// Remove the End endpoint, releasing its cell.
    pub fn clear_end(&mut self) {
        if let Some(e) = self.end.take() {
            self.release(e);
        }
    }

    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Reset every cell except the endpoints to `Free`.
    pub fn clear_obstacles(&mut self) {
        for c in self.cells.iter_mut() {
            if !c.is_endpoint() {
                *c = CellState::Free;
            }
        }
    }

    /// Fill every non-endpoint cell with `state`.
    ///
    /// Endpoint states are ignored; use [`set_start`](Self::set_start) and
    /// [`set_end`](Self::set_end) for those.
    pub fn fill(&mut self, state: CellState) {
        if state.is_endpoint() {
            return;
        }
        for c in self.cells.iter_mut() {
            if !c.is_endpoint() {
                *c = state;
            }
        }
    }

    /// Count how many cells are in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Iterate over `(Point, CellState)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    fn write(&mut self, p: Point, state: CellState) -> Option<CellState> {
        let i = self.index(p)?;
        let cell = self.cells.get_mut(i)?;
        Some(std::mem::replace(cell, state))
    }

    /// Rewrite a cell that just lost an endpoint: it shows the endpoint
    /// still placed there, if any, and is free otherwise.
    fn release(&mut self, p: Point) {
        let state = if self.start == Some(p) {
            CellState::Start
        } else if self.end == Some(p) {
            CellState::End
        } else {
            CellState::Free
        };
        self.write(p, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    #[test]
    fn new_grid_is_free() {
        let g = OccupancyGrid::new(4, 3);
        assert_eq!(g.bounds(), Range::of_size(4, 3));
        assert_eq!(g.count(CellState::Free), 12);
        assert_eq!(g.at(Point::new(3, 2)), Some(CellState::Free));
        assert_eq!(g.at(Point::new(4, 0)), None);
        assert_eq!(g.start(), None);
        assert_eq!(g.end(), None);
    }

    #[test]
    fn set_returns_previous_state() {
        let mut g = OccupancyGrid::new(4, 4);
        let p = Point::new(1, 2);
        assert_eq!(g.set(p, CellState::Obstacle), Some(CellState::Free));
        assert_eq!(g.set(p, CellState::Free), Some(CellState::Obstacle));
        assert_eq!(g.set(Point::new(9, 9), CellState::Obstacle), None);
    }

    #[test]
    fn passability_follows_cell_state() {
        let mut g = OccupancyGrid::new(3, 3);
        g.set(Point::new(0, 0), CellState::Obstacle);
        g.set(Point::new(1, 0), CellState::Reserved(Color::from_rgb(9, 9, 9)));
        g.set_start(Point::new(2, 0));
        assert!(!g.is_passable(Point::new(0, 0)));
        assert!(!g.is_passable(Point::new(1, 0)));
        assert!(g.is_passable(Point::new(2, 0)));
        assert!(g.is_passable(Point::new(1, 1)));
        assert!(!g.is_passable(Point::new(-1, 1)));
    }

    #[test]
    fn moving_start_frees_old_cell() {
        let mut g = OccupancyGrid::new(5, 5);
        g.set_start(Point::new(0, 0));
        g.set_start(Point::new(2, 3));
        assert_eq!(g.start(), Some(Point::new(2, 3)));
        assert_eq!(g.at(Point::new(0, 0)), Some(CellState::Free));
        assert_eq!(g.at(Point::new(2, 3)), Some(CellState::Start));
        assert_eq!(g.count(CellState::Start), 1);
    }

    #[test]
    fn endpoints_may_share_a_cell() {
        let mut g = OccupancyGrid::new(5, 5);
        g.set_start(Point::new(1, 1));
        g.set_end(Point::new(3, 3));
        g.set_end(Point::new(1, 1));
        assert_eq!(g.start(), Some(Point::new(1, 1)));
        assert_eq!(g.end(), Some(Point::new(1, 1)));
        assert_eq!(g.at(Point::new(1, 1)), Some(CellState::End));
        assert_eq!(g.at(Point::new(3, 3)), Some(CellState::Free));

        // Moving End away leaves the Start marker behind.
        g.set_end(Point::new(4, 4));
        assert_eq!(g.at(Point::new(1, 1)), Some(CellState::Start));
    }

    #[test]
    fn obstacle_over_endpoint_forgets_it() {
        let mut g = OccupancyGrid::new(5, 5);
        g.set_start(Point::new(0, 0));
        g.set_end(Point::new(2, 2));
        g.set(Point::new(2, 2), CellState::Obstacle);
        assert_eq!(g.end(), None);
        assert_eq!(g.start(), Some(Point::new(0, 0)));
        // Clearing the forgotten endpoint must not touch the obstacle.
        g.clear_end();
        assert_eq!(g.at(Point::new(2, 2)), Some(CellState::Obstacle));
    }

    #[test]
    fn set_with_endpoint_state_moves_endpoint() {
        let mut g = OccupancyGrid::new(3, 3);
        g.set(Point::new(0, 1), CellState::End);
        assert_eq!(g.end(), Some(Point::new(0, 1)));
        g.set(Point::new(2, 1), CellState::End);
        assert_eq!(g.end(), Some(Point::new(2, 1)));
        assert_eq!(g.count(CellState::End), 1);
    }

    #[test]
    fn clear_obstacles_keeps_endpoints() {
        let mut g = OccupancyGrid::new(3, 3);
        g.fill(CellState::Obstacle);
        g.set_start(Point::new(0, 0));
        g.set_end(Point::new(2, 2));
        assert_eq!(g.count(CellState::Obstacle), 7);
        g.clear_obstacles();
        assert_eq!(g.count(CellState::Free), 7);
        assert_eq!(g.start(), Some(Point::new(0, 0)));
        assert_eq!(g.end(), Some(Point::new(2, 2)));
    }

    #[test]
    fn iter_row_major() {
        let mut g = OccupancyGrid::new(3, 2);
        g.set(Point::new(1, 1), CellState::Obstacle);
        let items: Vec<_> = g.iter().collect();
        assert_eq!(items.len(), 6);
        assert_eq!(items[4], (Point::new(1, 1), CellState::Obstacle));
    }
}
