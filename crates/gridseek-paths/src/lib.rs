//! Best-first path search on occupancy grids that may change mid-search.
//!
//! This crate searches an [`OccupancyGrid`](gridseek_core::OccupancyGrid)
//! for a minimum-cost path from its Start cell to its End cell:
//!
//! - **A\***, **uniform-cost** and **greedy best-first** ordering ([`Mode`])
//! - **Manhattan** (4-connected), **octile** and **Chebyshev** (8-connected)
//!   metrics ([`Metric`])
//! - Step-wise execution for visualisation ([`SearchEngine::step`],
//!   [`SearchSnapshot`])
//! - Background execution with cancellation ([`SearchTask`], [`Context`])
//!
//! The grid lives in a [`SharedGrid`]. Other threads may edit it while a
//! search runs; a cell reported through [`SharedGrid::notify_cell_changed`]
//! is reconsidered on the next iteration.
//!
//! # Example
//!
//! ```
//! use gridseek_core::{OccupancyGrid, Point};
//! use gridseek_paths::{Metric, SearchConfig, SearchEngine, SharedGrid};
//!
//! let mut grid = OccupancyGrid::new(5, 5);
//! grid.set_start(Point::new(0, 0));
//! grid.set_end(Point::new(4, 4));
//!
//! let config = SearchConfig::new().with_metric(Metric::Octile);
//! let mut engine = SearchEngine::new(config, SharedGrid::new(grid));
//! let outcome = engine.run().unwrap();
//! assert_eq!(outcome.total_cost().unwrap().to_string(), "5.6");
//! ```
//!
//! # Costs
//!
//! | Step | Cost |
//! |---|---|
//! | axis-aligned | 1 |
//! | diagonal, octile | 1.4 |
//! | diagonal, Chebyshev | 1 |
//!
//! Costs are kept in tenths ([`Cost`]) so comparisons are exact.

mod cancel;
mod config;
mod cost;
mod distance;
mod engine;
mod error;
mod frontier;
mod neighbors;
mod node;
mod shared;
mod task;

pub use cancel::Context;
pub use config::{Metric, Mode, SearchConfig, SearchContext};
pub use cost::Cost;
pub use distance::{chebyshev, manhattan, octile};
pub use engine::{AbortReason, Phase, SearchEngine, SearchOutcome, SearchSnapshot, Terminal};
pub use error::SearchError;
pub use frontier::Frontier;
pub use neighbors::Neighbors;
pub use node::Node;
pub use shared::SharedGrid;
pub use task::SearchTask;
