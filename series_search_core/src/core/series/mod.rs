use std::{fmt, future::Future, sync::Arc};

pub mod memory;

pub type Predicate<V> = Arc<dyn Fn(&V, &V) -> bool + Send + Sync>;

/// Equality and ordering capability of a series' element type.
///
/// Searches only ever ask "equal?" and "less than?", so element types without a
/// total order (floats, nullable values, collated strings) plug in their own rules.
pub struct Comparators<V> {
    equal: Predicate<V>,
    less_than: Predicate<V>,
}

impl<V> Comparators<V> {
    pub fn new<E, L>(equal: E, less_than: L) -> Self
    where
        E: Fn(&V, &V) -> bool + Send + Sync + 'static,
        L: Fn(&V, &V) -> bool + Send + Sync + 'static,
    {
        Self {
            equal: Arc::new(equal),
            less_than: Arc::new(less_than),
        }
    }

    #[inline]
    pub fn is_equal(&self, a: &V, b: &V) -> bool {
        (self.equal)(a, b)
    }

    #[inline]
    pub fn is_less_than(&self, a: &V, b: &V) -> bool {
        (self.less_than)(a, b)
    }
}

impl<V: PartialEq + PartialOrd> Comparators<V> {
    /// Comparators backed by the type's own `PartialEq` / `PartialOrd`.
    pub fn natural() -> Self {
        Self::new(|a: &V, b: &V| a == b, |a: &V, b: &V| a < b)
    }
}

impl<V> Clone for Comparators<V> {
    fn clone(&self) -> Self {
        Self {
            equal: Arc::clone(&self.equal),
            less_than: Arc::clone(&self.less_than),
        }
    }
}

impl<V> fmt::Debug for Comparators<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparators").finish_non_exhaustive()
    }
}

/// Read access to a series whose exclusive lock is already held.
///
/// Implementations must never lock: the owner of the view holds the lock for as long
/// as any clone of the view is alive.
pub trait SeriesView: Send + Sync + 'static {
    type Value;

    fn row_count(&self) -> usize;

    /// Value stored at `row`. Callers only pass rows below [`row_count`](Self::row_count).
    fn value_at(&self, row: usize) -> &Self::Value;
}

/// A row-indexed column that can be searched.
pub trait Series: Send + Sync {
    type Value: PartialEq + Send + Sync + 'static;
    type View: SeriesView<Value = Self::Value> + Clone;

    /// Acquires exclusive access to the series. Access is released once the returned
    /// view and all of its clones are dropped.
    fn lock_exclusive(&self) -> impl Future<Output = Self::View> + Send;

    fn comparators(&self) -> Comparators<Self::Value>;
}
