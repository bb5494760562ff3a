use log::trace;

use crate::core::{
    cancellation::CancellationSignal,
    error::SearchError,
    series::{Comparators, SeriesView},
};

use super::{
    interval::{SearchInterval, SearchMode},
    partitioner::Partition,
};

/// Rows matched inside one partition, ascending, plus the reason the scan stopped
/// early (if it did). Rows found before a stop are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult {
    pub partition: usize,
    pub rows: Vec<usize>,
    pub error: Option<SearchError>,
}

impl PartialResult {
    pub fn failed(partition: usize, error: SearchError) -> Self {
        Self {
            partition,
            rows: Vec::new(),
            error: Some(error),
        }
    }
}

/// Scans `partition` in ascending row order and collects the rows whose value matches
/// `interval` under `mode`.
///
/// The signal is checked before every row; once it fires the scan stops and reports
/// its reason. `view` is read without locking.
pub fn scan_partition<V: SeriesView>(
    partition: &Partition,
    interval: &SearchInterval<V::Value>,
    mode: SearchMode,
    view: &V,
    comparators: &Comparators<V::Value>,
    signal: &CancellationSignal,
) -> PartialResult {
    let mut rows = Vec::new();
    let mut error = None;
    let mut scanned = 0usize;

    for row in partition.rows() {
        if let Err(reason) = signal.check() {
            error = Some(SearchError::Cancelled(reason));
            break;
        }

        let value = view.value_at(row);
        scanned += 1;

        let matched = match mode {
            SearchMode::Equality => comparators.is_equal(value, &interval.lower),
            SearchMode::Range => {
                !comparators.is_less_than(value, &interval.lower)
                    && (comparators.is_less_than(value, &interval.upper)
                        || comparators.is_equal(value, &interval.upper))
            }
        };

        if matched {
            rows.push(row);
        }
    }

    trace!(
        "partition {}: scanned {}/{} rows, {} matches{}",
        partition.index,
        scanned,
        partition.len,
        rows.len(),
        if error.is_some() { " (stopped)" } else { "" }
    );

    PartialResult {
        partition: partition.index,
        rows,
        error,
    }
}
