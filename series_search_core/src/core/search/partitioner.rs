use std::ops::Range as RowIter;

use smallvec::SmallVec;

pub type PartitionVec = SmallVec<[Partition; 32]>;

/// Contiguous row sub-range handled by a single worker.
///
/// A partition can be empty; it happens when there are fewer rows than workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub start: usize,
    pub len: usize,
}

impl Partition {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inclusive last row, `None` when empty.
    #[inline]
    pub fn end(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.start + self.len - 1)
        }
    }

    /// Row indices of the partition, ascending.
    #[inline]
    pub fn rows(&self) -> RowIter<usize> {
        self.start..self.start + self.len
    }
}

/// Splits the resolved inclusive range `[start, end]` into exactly `workers`
/// contiguous partitions, ascending. Every partition gets `total / workers` rows and
/// the last one also takes the remainder.
///
/// Bounds are not checked against any series; `start <= end` is expected.
pub fn partition(start: usize, end: usize, workers: usize) -> PartitionVec {
    debug_assert!(start <= end);

    let workers = workers.max(1);
    let total = end - start + 1;
    let chunk = total / workers;

    let mut partitions = PartitionVec::with_capacity(workers);

    for index in 0..workers - 1 {
        partitions.push(Partition {
            index,
            start: start + index * chunk,
            len: chunk,
        });
    }

    let last_start = start + (workers - 1) * chunk;
    partitions.push(Partition {
        index: workers - 1,
        start: last_start,
        len: end - last_start + 1,
    });

    partitions
}
