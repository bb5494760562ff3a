use crate::core::error::SearchError;

use super::scanner::PartialResult;

/// Merged answer of a search: matching rows ascending, and the first error reported
/// by any worker, in partition order. When `error` is set, `rows` holds what the
/// workers found before stopping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub rows: Vec<usize>,
    pub error: Option<SearchError>,
}

impl SearchOutcome {
    pub fn failed(error: SearchError) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(error),
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Drops partial rows on error.
    pub fn into_result(self) -> Result<Vec<usize>, SearchError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.rows),
        }
    }
}

/// Concatenates per-partition results in partition order. `partials[i]` must hold
/// partition `i`; partitions are disjoint and ascending so no sort is needed.
pub fn aggregate(partials: Vec<PartialResult>) -> SearchOutcome {
    let count = partials.iter().map(|p| p.rows.len()).sum();

    let mut rows = Vec::with_capacity(count);
    let mut error = None;

    for (slot, partial) in partials.into_iter().enumerate() {
        debug_assert_eq!(slot, partial.partition);

        rows.extend_from_slice(&partial.rows);

        if error.is_none() {
            error = partial.error;
        }
    }

    SearchOutcome { rows, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CancelReason;

    fn partial(partition: usize, rows: &[usize], error: Option<SearchError>) -> PartialResult {
        PartialResult {
            partition,
            rows: rows.to_vec(),
            error,
        }
    }

    #[test]
    fn concatenates_in_partition_order() {
        let out = aggregate(vec![
            partial(0, &[0, 2], None),
            partial(1, &[], None),
            partial(2, &[5, 6, 9], None),
        ]);

        assert_eq!(out.rows, vec![0, 2, 5, 6, 9]);
        assert!(out.is_complete());
        assert_eq!(out.into_result(), Ok(vec![0, 2, 5, 6, 9]));
    }

    #[test]
    fn keeps_partial_rows_and_reports_the_first_error() {
        let cancelled = SearchError::Cancelled(CancelReason::Cancelled);
        let failed = SearchError::WorkerFailed {
            partition: 2,
            reason: "boom".to_string(),
        };

        let out = aggregate(vec![
            partial(0, &[1], None),
            partial(1, &[4], Some(cancelled.clone())),
            partial(2, &[], Some(failed)),
        ]);

        assert_eq!(out.rows, vec![1, 4]);
        assert_eq!(out.error, Some(cancelled.clone()));
        assert_eq!(out.into_result(), Err(cancelled));
    }

    #[test]
    fn no_partials_means_no_rows() {
        assert_eq!(aggregate(Vec::new()), SearchOutcome::default());
    }
}
