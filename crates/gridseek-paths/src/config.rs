//! Search configuration: [`Mode`], [`Metric`], [`SearchConfig`] and the
//! per-run [`SearchContext`].

use std::fmt;
use std::time::Duration;

use gridseek_core::Point;

use crate::cost::Cost;
use crate::distance::{chebyshev, manhattan, octile};
use crate::error::SearchError;

/// Which search algorithm orders the open set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Dijkstra-style: order by accumulated cost only.
    UniformCost,
    /// Order by heuristic only; accumulated cost is ignored.
    GreedyBestFirst,
    /// Order by accumulated cost plus heuristic.
    #[default]
    AStar,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UniformCost => "uniform-cost search",
            Self::GreedyBestFirst => "greedy best-first search",
            Self::AStar => "A*",
        })
    }
}

/// Distance metric. It fixes both the heuristic and the neighborhood:
/// Manhattan searches 4-connected, the others 8-connected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    #[default]
    Manhattan,
    /// Euclidean approximation: diagonal steps cost 1.4.
    Octile,
    /// Diagonal steps cost the same as straight ones.
    Chebyshev,
}

impl Metric {
    /// Whether diagonal moves are generated under this metric.
    #[inline]
    pub const fn allows_diagonals(self) -> bool {
        !matches!(self, Self::Manhattan)
    }

    /// Heuristic distance between two cells.
    pub fn estimate(self, from: Point, to: Point) -> Cost {
        match self {
            Self::Manhattan => Cost::STRAIGHT * manhattan(from, to),
            Self::Octile => octile(from, to),
            Self::Chebyshev => Cost::STRAIGHT * chebyshev(from, to),
        }
    }

    /// Cost of a single step between adjacent cells.
    pub fn step_cost(self, from: Point, to: Point) -> Cost {
        if from.is_axis_aligned_with(to) {
            return Cost::STRAIGHT;
        }
        match self {
            Self::Octile => Cost::DIAGONAL,
            Self::Chebyshev => Cost::STRAIGHT,
            // Never generated as a neighbor; priced as the two axis steps it
            // replaces.
            Self::Manhattan => Cost::STRAIGHT * 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manhattan => "Manhattan distance",
            Self::Octile => "octile distance",
            Self::Chebyshev => "Chebyshev distance",
        })
    }
}

/// Settings for a search run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub mode: Mode,
    pub metric: Metric,
    /// Expand the open node with the highest cost instead of the lowest.
    pub prefer_max: bool,
    /// Pause between iterations, for animating a search.
    pub step_delay: Duration,
}

impl SearchConfig {
    /// Create a configuration with default values (A*, Manhattan).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_prefer_max(mut self, prefer_max: bool) -> Self {
        self.prefer_max = prefer_max;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }
}

/// The immutable facts every [`Node`](crate::Node) of one run is costed
/// against: the End position, the mode and the metric.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchContext {
    pub end: Point,
    pub mode: Mode,
    pub metric: Metric,
}

impl SearchContext {
    /// Build a context. Fails with [`SearchError::NoEndPoint`] if `end` is
    /// not set.
    pub fn new(end: Option<Point>, mode: Mode, metric: Metric) -> Result<Self, SearchError> {
        let end = end.ok_or(SearchError::NoEndPoint)?;
        Ok(Self { end, mode, metric })
    }

    /// Build a context from a configuration.
    pub fn from_config(config: &SearchConfig, end: Option<Point>) -> Result<Self, SearchError> {
        Self::new(end, config.mode, config.metric)
    }
}
