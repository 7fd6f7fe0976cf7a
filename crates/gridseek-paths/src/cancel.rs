use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag. A search checks it once per iteration.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
