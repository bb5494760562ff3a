use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use series_search_core::{
    CancelReason, CancellationSignal, Comparators, MemorySeries, Range, RangeError, SearchError, SearchOptions,
    Series, SeriesView, search, search_with_options,
};

/// Series guarded by a mutex instead of a read/write lock.
#[derive(Clone)]
struct MutexSeries {
    values: Arc<Mutex<Vec<u16>>>,
}

#[derive(Clone)]
struct MutexView(Arc<OwnedMutexGuard<Vec<u16>>>);

impl SeriesView for MutexView {
    type Value = u16;

    fn row_count(&self) -> usize {
        self.0.len()
    }

    fn value_at(&self, row: usize) -> &u16 {
        &self.0[row]
    }
}

impl Series for MutexSeries {
    type Value = u16;
    type View = MutexView;

    async fn lock_exclusive(&self) -> MutexView {
        MutexView(Arc::new(Arc::clone(&self.values).lock_owned().await))
    }

    fn comparators(&self) -> Comparators<u16> {
        Comparators::natural()
    }
}

#[tokio::test]
async fn custom_series_implementations_can_be_searched() {
    let _ = env_logger::builder().is_test(true).try_init();

    let series = MutexSeries {
        values: Arc::new(Mutex::new(vec![5, 3, 9, 3, 7])),
    };
    let signal = CancellationSignal::new();

    let out = search(&signal, &series, 3, 3, None).await;
    assert_eq!(out.into_result(), Ok(vec![1, 3]));

    let out = search(&signal, &series, 3, 7, None).await;
    assert_eq!(out.into_result(), Ok(vec![0, 1, 3, 4]));

    let out = search(&signal, &series, 3, 7, Some(Range::finite(10, 2))).await;
    assert_eq!(
        out.into_result(),
        Err(SearchError::InvalidRange(RangeError::OutOfBounds { bound: 10, row_count: 5 }))
    );

    // The lock is released after every search.
    series.values.lock().await.push(4);
    let out = search(&signal, &series, 4, 4, None).await;
    assert_eq!(out.rows, vec![5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn searches_see_either_the_old_or_the_new_series() {
    let series = MemorySeries::new((0..10_000i64).map(|i| i % 100).collect());
    let before: Vec<usize> = (0..10_000).filter(|i| i % 100 == 42).collect();
    let mut after = before.clone();
    after.extend(10_000..10_100);

    let writer = {
        let series = series.clone();
        tokio::spawn(async move { series.append(std::iter::repeat_n(42, 100)).await })
    };

    let searches = (0..8)
        .map(|workers| {
            let series = series.clone();
            tokio::spawn(async move {
                let options = SearchOptions {
                    workers: Some(workers + 1),
                    fail_fast: false,
                };
                search_with_options(&CancellationSignal::new(), &series, 42, 42, None, options).await
            })
        })
        .collect::<Vec<_>>();

    writer.await.unwrap();

    for handle in searches {
        let rows = handle.await.unwrap().into_result().unwrap();
        assert!(rows == before || rows == after, "got {} rows", rows.len());
    }

    let out = search(&CancellationSignal::new(), &series, 42, 42, None).await;
    assert_eq!(out.rows, after);
}

#[tokio::test]
async fn cancelled_before_start_reports_the_caller_reason() {
    let series = MemorySeries::new(vec![1.0f64, 2.0, 3.0]);
    let signal = CancellationSignal::new();
    signal.cancel();

    let out = search(&signal, &series, 1.0, 3.0, None).await;

    assert!(out.rows.is_empty());
    assert!(!out.is_complete());
    assert_eq!(out.error, Some(SearchError::Cancelled(CancelReason::Cancelled)));
}
