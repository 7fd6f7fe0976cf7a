//! Running a [`SearchEngine`] on a background thread.

use std::sync::mpsc::{self, Receiver, TryIter};
use std::thread::{self, JoinHandle};

use crate::cancel::Context;
use crate::engine::{SearchEngine, SearchOutcome, SearchSnapshot};
use crate::error::SearchError;

/// A search running on its own thread.
///
/// The thread publishes a [`SearchSnapshot`] after every iteration. Edit the
/// grid through a clone of the engine's [`SharedGrid`](crate::SharedGrid)
/// while it runs.
#[derive(Debug)]
pub struct SearchTask {
    handle: JoinHandle<Result<SearchOutcome, SearchError>>,
    cancel: Context,
    snapshots: Receiver<SearchSnapshot>,
}

impl SearchTask {
    /// Start `engine` on a new thread. Cancelling `cancel` (or calling
    /// [`cancel`](Self::cancel)) stops it before its next iteration.
    pub fn spawn(mut engine: SearchEngine, cancel: Context) -> Self {
        let (tx, rx) = mpsc::channel();
        let token = cancel.clone();
        let handle = thread::spawn(move || {
            engine.run_with(&token, |e| {
                // The receiver may be gone; the search finishes regardless.
                let _ = tx.send(e.snapshot());
            })
        });
        Self {
            handle,
            cancel,
            snapshots: rx,
        }
    }

    /// Request cancellation. The outcome becomes `Aborted(Cancelled)` unless
    /// the search finishes first.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// The newest snapshot published since the last call, discarding older
    /// ones.
    pub fn try_snapshot(&self) -> Option<SearchSnapshot> {
        self.snapshots.try_iter().last()
    }

    /// Every snapshot published since the last call, oldest first.
    pub fn snapshots(&self) -> TryIter<'_, SearchSnapshot> {
        self.snapshots.try_iter()
    }

    /// Wait for the search to end.
    pub fn join(self) -> Result<SearchOutcome, SearchError> {
        self.handle.join().map_err(|_| {
            log::warn!("search thread panicked");
            SearchError::TaskPanicked
        })?
    }
}
