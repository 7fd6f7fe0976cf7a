//! The step-wise search engine.
//!
//! A [`SearchEngine`] runs one search over a [`SharedGrid`]. Each call to
//! [`SearchEngine::step`] is one iteration: consume the pending grid
//! mutation, check for termination, then expand the preferred open node.
//! The grid is locked for exactly one iteration, so edits made by other
//! threads land between iterations.

use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::thread;

use gridseek_core::{OccupancyGrid, Point};

use crate::cancel::Context;
use crate::config::{SearchConfig, SearchContext};
use crate::cost::Cost;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::neighbors::Neighbors;
use crate::node::Node;
use crate::shared::SharedGrid;

// ---------------------------------------------------------------------------
// Phases and outcomes
// ---------------------------------------------------------------------------

/// Why a search stopped without reaching a verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbortReason {
    /// Start or End was not set when the search began.
    MissingEndpoints,
    /// The search was cancelled.
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingEndpoints => "missing endpoints",
            Self::Cancelled => "cancelled",
        })
    }
}

/// How a finished search ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminal {
    Found,
    NotFound,
    Aborted(AbortReason),
}

/// Lifecycle of a [`SearchEngine`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Terminal(Terminal),
}

impl Phase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// The result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// A path was found. `path` runs from End back to Start.
    Found { path: Vec<Point>, total_cost: Cost },
    NotFound,
    Aborted(AbortReason),
}

impl SearchOutcome {
    fn terminal(&self) -> Terminal {
        match self {
            Self::Found { .. } => Terminal::Found,
            Self::NotFound => Terminal::NotFound,
            Self::Aborted(reason) => Terminal::Aborted(*reason),
        }
    }

    /// The path, if one was found.
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            Self::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The path cost, if one was found.
    pub fn total_cost(&self) -> Option<Cost> {
        match self {
            Self::Found { total_cost, .. } => Some(*total_cost),
            _ => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { path, total_cost } => {
                write!(f, "found path of {} cells, cost {total_cost}", path.len())
            }
            Self::NotFound => f.write_str("no path"),
            Self::Aborted(reason) => write!(f, "aborted: {reason}"),
        }
    }
}

/// An owned picture of the engine between two iterations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSnapshot {
    pub phase: Phase,
    /// Open positions, sorted row-major.
    pub open: Vec<Point>,
    /// Closed positions, sorted row-major.
    pub closed: Vec<Point>,
    pub current: Option<Point>,
    pub iterations: usize,
    /// End-to-Start path once one has been found.
    pub path: Option<Vec<Point>>,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Best-first search over a [`SharedGrid`] that tolerates cells changing
/// while it runs.
///
/// Changes are picked up through the grid's mutation slot (see
/// [`SharedGrid::notify_cell_changed`]): a cell that becomes passable next
/// to an already expanded node is re-opened. Changes that are not notified
/// only affect cells the search has not reached yet.
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    grid: SharedGrid,
    ctx: Option<SearchContext>,
    open: Frontier,
    closed: HashMap<Point, Node>,
    current: Option<Point>,
    phase: Phase,
    outcome: Option<SearchOutcome>,
    iterations: usize,
}

impl SearchEngine {
    pub fn new(config: SearchConfig, grid: SharedGrid) -> Self {
        let open = Frontier::new(config.prefer_max);
        Self {
            config,
            grid,
            ctx: None,
            open,
            closed: HashMap::new(),
            current: None,
            phase: Phase::Idle,
            outcome: None,
            iterations: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Seed the search with the grid's Start cell.
    ///
    /// If Start or End is unset the engine ends in
    /// `Terminal(Aborted(MissingEndpoints))` without expanding anything.
    pub fn start(&mut self) -> Result<(), SearchError> {
        if self.phase != Phase::Idle {
            return Err(SearchError::AlreadyStarted);
        }
        let (start, end) = self.grid.read(|g| (g.start(), g.end()));
        let (Some(start), Some(end)) = (start, end) else {
            log::warn!("search started without endpoints (start {start:?}, end {end:?})");
            self.finish(SearchOutcome::Aborted(AbortReason::MissingEndpoints));
            return Err(SearchError::MissingEndpoints);
        };
        let ctx = SearchContext::from_config(&self.config, Some(end))?;
        log::debug!(
            "starting {} with {} from {start} to {end}",
            ctx.mode,
            ctx.metric
        );
        self.open.push(Node::new(&ctx, start, None));
        self.ctx = Some(ctx);
        self.grid.begin_search();
        self.phase = Phase::Running;
        Ok(())
    }

    /// Run one iteration and return the resulting phase.
    ///
    /// Does nothing unless the engine is running.
    pub fn step(&mut self) -> Phase {
        let (Phase::Running, Some(ctx)) = (self.phase, self.ctx) else {
            return self.phase;
        };
        let handle = self.grid.clone();
        let mut shared = handle.lock();

        if let Some(p) = shared.pending.take() {
            self.apply_mutation(&ctx, &shared.grid, p);
        }

        // A moved or cleared End invalidates every cost computed so far.
        let end_moved = shared.grid.end() != Some(ctx.end);
        let reached = !end_moved && self.current == Some(ctx.end);
        if reached || end_moved || self.open.is_empty() {
            drop(shared);
            let outcome = if reached {
                let path = self.backtrack(ctx.end);
                let total_cost = Node::path_cost(&ctx, &path);
                SearchOutcome::Found {
                    path: path.iter().map(Node::pos).collect(),
                    total_cost,
                }
            } else {
                SearchOutcome::NotFound
            };
            self.finish(outcome);
            return self.phase;
        }

        if let Some(current) = self.pop_passable(&shared.grid) {
            log::trace!("expanding {current}");
            self.closed.insert(current.pos(), current);
            self.current = Some(current.pos());
            self.iterations += 1;
            self.expand(&ctx, &shared.grid, &current);
        }
        self.phase
    }

    /// Run to completion: [`start`](Self::start) if still idle, then
    /// [`step`](Self::step) until the search ends.
    pub fn run(&mut self) -> Result<SearchOutcome, SearchError> {
        self.run_with(&Context::new(), |_| {})
    }

    /// Like [`run`](Self::run), checking `cancel` before every iteration and
    /// calling `on_step` after each one.
    pub fn run_with<F>(
        &mut self,
        cancel: &Context,
        mut on_step: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&SearchEngine),
    {
        if self.phase == Phase::Idle {
            self.start()?;
        }
        while self.phase == Phase::Running {
            if cancel.is_done() {
                self.abort();
                break;
            }
            let phase = self.step();
            on_step(self);
            if !phase.is_terminal() && !self.config.step_delay.is_zero() {
                thread::sleep(self.config.step_delay);
            }
        }
        Ok(self.outcome.clone().unwrap_or(SearchOutcome::NotFound))
    }

    /// Stop a running search with `Aborted(Cancelled)`.
    pub fn abort(&mut self) {
        if self.phase == Phase::Running {
            self.finish(SearchOutcome::Aborted(AbortReason::Cancelled));
        }
    }

    /// Drop all search state and return to `Idle`.
    pub fn reset(&mut self) {
        if self.phase == Phase::Running {
            self.grid.end_search();
        }
        self.ctx = None;
        self.open.clear();
        self.closed.clear();
        self.current = None;
        self.phase = Phase::Idle;
        self.outcome = None;
        self.iterations = 0;
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The outcome, once the search has ended.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    pub fn open_nodes(&self) -> impl Iterator<Item = &Node> {
        self.open.iter()
    }

    pub fn closed_nodes(&self) -> impl Iterator<Item = &Node> {
        self.closed.values()
    }

    /// The most recently expanded position.
    #[inline]
    pub fn current(&self) -> Option<Point> {
        self.current
    }

    #[inline]
    pub fn is_open(&self, p: Point) -> bool {
        self.open.contains(p)
    }

    #[inline]
    pub fn is_closed(&self, p: Point) -> bool {
        self.closed.contains_key(&p)
    }

    /// Number of nodes expanded so far.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let mut open: Vec<Point> = self.open.iter().map(Node::pos).collect();
        let mut closed: Vec<Point> = self.closed.keys().copied().collect();
        open.sort_unstable();
        closed.sort_unstable();
        SearchSnapshot {
            phase: self.phase,
            open,
            closed,
            current: self.current,
            iterations: self.iterations,
            path: self.outcome.as_ref().and_then(|o| o.path()).map(<[Point]>::to_vec),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn finish(&mut self, outcome: SearchOutcome) {
        if self.phase == Phase::Running {
            self.grid.end_search();
        }
        log::debug!("search finished after {} iterations: {outcome}", self.iterations);
        self.phase = Phase::Terminal(outcome.terminal());
        self.outcome = Some(outcome);
    }

    /// Re-open a cell that changed under a running search, parented to its
    /// cheapest expanded neighbor.
    fn apply_mutation(&mut self, ctx: &SearchContext, grid: &OccupancyGrid, p: Point) {
        if !grid.is_passable(p) || self.closed.contains_key(&p) {
            return;
        }
        let mut node = Node::new(ctx, p, None);
        for q in Neighbors::new(p, ctx.metric.allows_diagonals()) {
            let Some(parent) = self.closed.get(&q) else {
                continue;
            };
            if node.parent().is_none() || node.f_cost(ctx, parent) < node.cost() {
                node.set_parent(ctx, Some(parent));
            }
        }
        if node.parent().is_none() {
            return;
        }
        if self.open.get(p).is_some_and(|open| open.cost() <= node.cost()) {
            return;
        }
        log::debug!("cell {p} changed, reopened with cost {}", node.cost());
        self.open.push(node);
    }

    /// Pop the preferred open node, dropping any whose cell has since
    /// become impassable.
    fn pop_passable(&mut self, grid: &OccupancyGrid) -> Option<Node> {
        iter::from_fn(|| self.open.pop()).find(|n| grid.is_passable(n.pos()))
    }

    fn expand(&mut self, ctx: &SearchContext, grid: &OccupancyGrid, current: &Node) {
        for nb in current.neighbors(ctx) {
            let p = nb.pos();
            if !grid.is_passable(p) || self.closed.contains_key(&p) {
                continue;
            }
            match self.open.get(p) {
                Some(open) if open.f_cost(ctx, current) >= open.cost() => {}
                Some(open) => {
                    let mut relaxed = *open;
                    relaxed.set_parent(ctx, Some(current));
                    self.open.push(relaxed);
                }
                None => {
                    self.open.push(nb);
                }
            }
        }
    }

    /// Follow parent links from `end` back to Start.
    fn backtrack(&self, end: Point) -> Vec<Node> {
        iter::successors(self.closed.get(&end), |n| {
            n.parent().and_then(|p| self.closed.get(&p))
        })
        .take(self.closed.len())
        .copied()
        .collect()
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            self.grid.end_search();
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn outcome_json_round_trip() {
        let out = SearchOutcome::Found {
            path: vec![Point::new(2, 0), Point::new(1, 0), Point::ZERO],
            total_cost: Cost::from_tenths(20),
        };
        let json = serde_json::to_string(&out).unwrap();
        let back: SearchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
    }
}
