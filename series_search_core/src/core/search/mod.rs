//! Parallel bounded-range value search over a single series.
//!
//! A search locks the series exclusively for the whole call, resolves the requested
//! row range, splits it into one partition per worker, scans every partition on the
//! blocking pool and concatenates the partial results in partition order. The
//! answer is therefore always ascending by row index, whatever order workers finish in.

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Instant,
};

use futures::future::join_all;
use log::{debug, warn};
use tokio::task;

use crate::{MAX_PERMITS_THREADS, configuration::Configuration};

use super::{
    cancellation::CancellationSignal,
    error::SearchError,
    range::Range,
    series::{Series, SeriesView},
};

pub mod aggregator;
pub mod interval;
pub mod partitioner;
pub mod scanner;

pub use aggregator::SearchOutcome;
pub use interval::{SearchInterval, SearchMode};

use aggregator::aggregate;
use partitioner::partition;
use scanner::{PartialResult, scan_partition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Number of partitions / workers. Falls back to [`MAX_PERMITS_THREADS`], then to
    /// the available parallelism of the machine. A search never uses more workers than
    /// the rows it covers.
    pub workers: Option<usize>,
    /// Stop sibling workers as soon as one worker fails. By default only the caller's
    /// signal stops workers.
    pub fail_fast: bool,
}

impl SearchOptions {
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| MAX_PERMITS_THREADS.get().copied())
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|p| p.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

impl From<&Configuration> for SearchOptions {
    fn from(config: &Configuration) -> Self {
        Self {
            workers: config.concurrent_threads,
            fail_fast: config.fail_fast.unwrap_or(false),
        }
    }
}

/// Finds the rows of `series` whose value lies in `lower..=upper`, or equals `lower`
/// when both bounds are equal. `range` restricts the rows searched and defaults to
/// the whole series.
///
/// The outcome always carries the rows found so far, even when `signal` fired.
pub async fn search<S: Series>(
    signal: &CancellationSignal,
    series: &S,
    lower: S::Value,
    upper: S::Value,
    range: Option<Range>,
) -> SearchOutcome {
    search_with_options(signal, series, lower, upper, range, SearchOptions::default()).await
}

pub async fn search_with_options<S: Series>(
    signal: &CancellationSignal,
    series: &S,
    lower: S::Value,
    upper: S::Value,
    range: Option<Range>,
    options: SearchOptions,
) -> SearchOutcome {
    let view = series.lock_exclusive().await;

    let (start, end) = match range.unwrap_or_default().limits(view.row_count()) {
        Ok(limits) => limits,
        Err(e) => {
            debug!("search aborted: {}", e);
            return SearchOutcome::failed(SearchError::InvalidRange(e));
        }
    };

    let interval = Arc::new(SearchInterval::new(lower, upper));
    let mode = interval.mode();
    // More workers than rows would only add empty partitions.
    let workers = options.worker_count().min(end - start + 1);
    let partitions = partition(start, end, workers);

    debug!(
        "search over rows {}..={} with {} workers ({:?} mode, fail_fast: {})",
        start, end, workers, mode, options.fail_fast
    );
    let search_start = Instant::now();

    // Workers watch a child so the search can stop them without touching the caller's signal.
    let worker_signal = signal.child();
    let cancel_on_drop = CancelOnDrop::new(worker_signal.clone());
    let comparators = series.comparators();

    let handles = partitions
        .iter()
        .map(|&partition| {
            let view = view.clone();
            let interval = Arc::clone(&interval);
            let comparators = comparators.clone();
            let signal = worker_signal.clone();
            let fail_fast = options.fail_fast;

            task::spawn_blocking(move || {
                let scanned = catch_unwind(AssertUnwindSafe(|| {
                    scan_partition(&partition, &*interval, mode, &view, &comparators, &signal)
                }));

                let result = scanned.unwrap_or_else(|payload| {
                    PartialResult::failed(
                        partition.index,
                        SearchError::WorkerFailed {
                            partition: partition.index,
                            reason: panic_reason(payload),
                        },
                    )
                });

                if fail_fast && result.error.is_some() {
                    signal.cancel();
                }

                result
            })
        })
        .collect::<Vec<_>>();

    // One slot per partition, in partition order.
    let partials = join_all(handles)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, joined)| {
            joined.unwrap_or_else(|e| {
                PartialResult::failed(
                    index,
                    SearchError::WorkerFailed {
                        partition: index,
                        reason: e.to_string(),
                    },
                )
            })
        })
        .collect::<Vec<_>>();

    cancel_on_drop.disarm();
    drop(view);

    let outcome = aggregate(partials);

    match &outcome.error {
        None => debug!(
            "search found {} rows in {:.2?}",
            outcome.rows.len(),
            search_start.elapsed()
        ),
        Some(SearchError::WorkerFailed { partition, reason }) => warn!(
            "search worker for partition {} failed: {}; returning {} rows",
            partition,
            reason,
            outcome.rows.len()
        ),
        Some(e) => debug!(
            "search stopped after {:.2?}: {}; returning {} rows",
            search_start.elapsed(),
            e,
            outcome.rows.len()
        ),
    }

    outcome
}

/// Cancels the workers when the search future is dropped before they were joined,
/// so they stop at their next row and release the view.
struct CancelOnDrop {
    signal: CancellationSignal,
    armed: bool,
}

impl CancelOnDrop {
    fn new(signal: CancellationSignal) -> Self {
        Self { signal, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed && self.signal.cancel() {
            debug!("search dropped before its workers finished, cancelling them");
        }
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
