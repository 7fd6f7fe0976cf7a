//! [`SharedGrid`]: the occupancy grid and the pending-mutation slot behind
//! one mutex, shared between the search task and whoever edits the grid.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gridseek_core::{CellState, OccupancyGrid, Point};

#[derive(Debug)]
pub(crate) struct SharedState {
    pub(crate) grid: OccupancyGrid,
    /// Most recent cell changed during a search. Last write wins.
    pub(crate) pending: Option<Point>,
    pub(crate) searching: bool,
}

/// A cloneable handle to a grid that may be edited while a search runs.
///
/// The search engine locks the grid once per iteration, so every iteration
/// sees a consistent grid. Editors should keep their own critical sections
/// short.
#[derive(Clone, Debug)]
pub struct SharedGrid {
    inner: Arc<Mutex<SharedState>>,
}

impl SharedGrid {
    pub fn new(grid: OccupancyGrid) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SharedState {
                grid,
                pending: None,
                searching: false,
            })),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("grid lock poisoned by a panicked holder, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Run `f` against the current grid.
    pub fn read<R>(&self, f: impl FnOnce(&OccupancyGrid) -> R) -> R {
        f(&self.lock().grid)
    }

    /// Edit the grid without notifying a running search.
    pub fn update<R>(&self, f: impl FnOnce(&mut OccupancyGrid) -> R) -> R {
        f(&mut self.lock().grid)
    }

    /// A copy of the current grid.
    pub fn snapshot(&self) -> OccupancyGrid {
        self.lock().grid.clone()
    }

    /// The state of the cell at `p`.
    pub fn cell_state(&self, p: Point) -> Option<CellState> {
        self.lock().grid.at(p)
    }

    /// Set a cell and, if its state changed while a search is running,
    /// record it as the pending mutation. Returns the previous state.
    pub fn set_cell(&self, p: Point, state: CellState) -> Option<CellState> {
        let mut shared = self.lock();
        let prev = shared.grid.set(p, state)?;
        if prev != state && shared.searching {
            shared.pending = Some(p);
        }
        Some(prev)
    }

    /// Record that the cell at `p` changed. Overwrites any mutation the
    /// search has not consumed yet; ignored when no search is running.
    pub fn notify_cell_changed(&self, p: Point) {
        let mut shared = self.lock();
        if shared.searching {
            shared.pending = Some(p);
        }
    }

    /// The mutation waiting to be consumed, if any.
    pub fn pending(&self) -> Option<Point> {
        self.lock().pending
    }

    /// Whether a search is currently running against this grid.
    pub fn is_searching(&self) -> bool {
        self.lock().searching
    }

    pub(crate) fn begin_search(&self) {
        let mut shared = self.lock();
        shared.searching = true;
        shared.pending = None;
    }

    pub(crate) fn end_search(&self) {
        let mut shared = self.lock();
        shared.searching = false;
        shared.pending = None;
    }
}

impl From<OccupancyGrid> for SharedGrid {
    fn from(grid: OccupancyGrid) -> Self {
        Self::new(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_need_an_active_search() {
        let shared = SharedGrid::new(OccupancyGrid::new(3, 3));
        shared.notify_cell_changed(Point::new(1, 1));
        assert_eq!(shared.pending(), None);

        shared.begin_search();
        shared.notify_cell_changed(Point::new(1, 1));
        assert_eq!(shared.pending(), Some(Point::new(1, 1)));

        shared.end_search();
        assert_eq!(shared.pending(), None);
        assert!(!shared.is_searching());
    }

    #[test]
    fn last_notification_wins() {
        let shared = SharedGrid::new(OccupancyGrid::new(3, 3));
        shared.begin_search();
        shared.notify_cell_changed(Point::new(0, 0));
        shared.notify_cell_changed(Point::new(2, 1));
        assert_eq!(shared.pending(), Some(Point::new(2, 1)));
    }

    #[test]
    fn set_cell_notifies_only_on_change() {
        let shared = SharedGrid::new(OccupancyGrid::new(3, 3));
        shared.begin_search();
        assert_eq!(
            shared.set_cell(Point::new(1, 1), CellState::Free),
            Some(CellState::Free)
        );
        assert_eq!(shared.pending(), None);

        shared.set_cell(Point::new(1, 1), CellState::Obstacle);
        assert_eq!(shared.pending(), Some(Point::new(1, 1)));
        assert_eq!(shared.cell_state(Point::new(1, 1)), Some(CellState::Obstacle));
        assert_eq!(shared.set_cell(Point::new(5, 5), CellState::Obstacle), None);
    }

    #[test]
    fn clones_share_the_grid() {
        let a = SharedGrid::new(OccupancyGrid::new(2, 2));
        let b = a.clone();
        a.update(|g| g.set_end(Point::new(1, 1)));
        assert_eq!(b.read(|g| g.end()), Some(Point::new(1, 1)));
        assert_eq!(b.snapshot().count(CellState::End), 1);
    }

    #[test]
    fn edits_from_another_thread_are_visible() {
        let shared = SharedGrid::new(OccupancyGrid::new(4, 4));
        let editor = shared.clone();
        std::thread::spawn(move || {
            editor.set_cell(Point::new(3, 3), CellState::Obstacle);
        })
        .join()
        .unwrap();
        assert_eq!(shared.cell_state(Point::new(3, 3)), Some(CellState::Obstacle));
    }
}
