use thiserror::Error;

/// Why a requested row range could not be resolved against a series.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("range undefined: series has no rows")]
    Undefined,

    #[error("range bound {bound} is out of bounds for {row_count} rows")]
    OutOfBounds { bound: isize, row_count: usize },

    #[error("range start {start} is after end {end}")]
    StartAfterEnd { start: usize, end: usize },
}

/// Reason reported by a cancellation signal once it has fired.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    #[error("search cancelled")]
    Cancelled,

    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("{0}")]
    Cancelled(#[from] CancelReason),

    #[error("worker for partition {partition} failed: {reason}")]
    WorkerFailed { partition: usize, reason: String },

    #[error("row {row} is out of bounds for {row_count} rows")]
    RowOutOfBounds { row: usize, row_count: usize },
}

impl SearchError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled(_))
    }
}
