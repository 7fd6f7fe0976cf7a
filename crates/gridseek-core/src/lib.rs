//! **gridseek-core**: occupancy-grid types for grid pathfinding.
//!
//! This crate provides the data the search engine consumes: geometry
//! primitives, per-cell occupancy states, and the [`OccupancyGrid`] holding
//! the cells and the Start/End endpoints.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{CellState, Color};
pub use geom::{Point, Range, RangeIter};
pub use grid::OccupancyGrid;
