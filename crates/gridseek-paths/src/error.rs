use std::fmt;

/// Errors raised when a search cannot be set up or completed.
///
/// Exhausting the open set without reaching End is not an error; it is the
/// [`SearchOutcome::NotFound`](crate::SearchOutcome::NotFound) outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// A search context was requested before an End position was set.
    NoEndPoint,
    /// A run was started without both Start and End on the grid.
    MissingEndpoints,
    /// `start` was called on an engine that is not idle.
    AlreadyStarted,
    /// The background search thread panicked.
    TaskPanicked,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEndPoint => write!(f, "no end point"),
            Self::MissingEndpoints => write!(f, "cannot search: start and end must both be set"),
            Self::AlreadyStarted => write!(f, "search already started"),
            Self::TaskPanicked => write!(f, "search thread panicked"),
        }
    }
}

impl std::error::Error for SearchError {}
