use std::sync::OnceLock;

/// Process-wide default worker count for searches, set once at startup.
/// Unset means one worker per available core.
pub static MAX_PERMITS_THREADS: OnceLock<usize> = OnceLock::new();

pub mod core;

pub mod configuration;

pub use crate::core::{
    cancellation::CancellationSignal,
    error::{CancelReason, RangeError, SearchError},
    range::Range,
    search::{SearchOptions, SearchOutcome, search, search_with_options},
    series::{Comparators, Series, SeriesView, memory::MemorySeries},
};
