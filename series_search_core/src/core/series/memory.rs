use std::sync::Arc;

use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::core::error::SearchError;

use super::{Comparators, Series, SeriesView};

/// In-memory series. Clones share the same storage and lock.
pub struct MemorySeries<T> {
    name: String,
    values: Arc<RwLock<Vec<T>>>,
    comparators: Comparators<T>,
}

impl<T> Clone for MemorySeries<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            values: Arc::clone(&self.values),
            comparators: self.comparators.clone(),
        }
    }
}

impl<T: PartialEq + PartialOrd + Send + Sync + 'static> MemorySeries<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self::with_comparators(values, Comparators::natural())
    }
}

impl<T: Send + Sync + 'static> MemorySeries<T> {
    pub fn with_comparators(values: Vec<T>, comparators: Comparators<T>) -> Self {
        Self {
            name: String::new(),
            values: Arc::new(RwLock::const_new(values)),
            comparators,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    pub async fn value(&self, row: usize) -> Option<T>
    where
        T: Clone,
    {
        self.values.read().await.get(row).cloned()
    }

    pub async fn push(&self, value: T) {
        self.values.write().await.push(value);
    }

    pub async fn append(&self, values: impl IntoIterator<Item = T>) {
        self.values.write().await.extend(values);
    }

    pub async fn update(&self, row: usize, value: T) -> Result<(), SearchError> {
        let mut values = self.values.write().await;
        let row_count = values.len();

        let slot = values
            .get_mut(row)
            .ok_or(SearchError::RowOutOfBounds { row, row_count })?;
        *slot = value;

        Ok(())
    }
}

impl<T: PartialEq + Send + Sync + 'static> Series for MemorySeries<T> {
    type Value = T;
    type View = ExclusiveView<T>;

    async fn lock_exclusive(&self) -> ExclusiveView<T> {
        let guard = Arc::clone(&self.values).write_owned().await;
        ExclusiveView {
            guard: Arc::new(guard),
        }
    }

    fn comparators(&self) -> Comparators<T> {
        self.comparators.clone()
    }
}

/// Shared handle on a held write guard of a [`MemorySeries`].
pub struct ExclusiveView<T> {
    guard: Arc<OwnedRwLockWriteGuard<Vec<T>>>,
}

impl<T> Clone for ExclusiveView<T> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<T: Send + Sync + 'static> SeriesView for ExclusiveView<T> {
    type Value = T;

    #[inline]
    fn row_count(&self) -> usize {
        self.guard.len()
    }

    #[inline]
    fn value_at(&self, row: usize) -> &T {
        &self.guard[row]
    }
}
