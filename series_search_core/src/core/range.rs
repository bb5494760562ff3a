use super::error::RangeError;

/// A requested, possibly partially-specified, inclusive row range.
///
/// - A missing `start` means the first row, a missing `end` the last row.
/// - Negative bounds count from the end of the series: `-1` is the last row.
///
/// The range is resolved once per search with [`Range::limits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Option<isize>,
    pub end: Option<isize>,
}

impl Range {
    /// The whole series.
    #[inline]
    pub const fn all() -> Self {
        Self { start: None, end: None }
    }

    #[inline]
    pub const fn new(start: Option<isize>, end: Option<isize>) -> Self {
        Self { start, end }
    }

    /// Both bounds given.
    #[inline]
    pub const fn finite(start: isize, end: isize) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    /// From `start` to the last row.
    #[inline]
    pub const fn starting_at(start: isize) -> Self {
        Self { start: Some(start), end: None }
    }

    /// From the first row to `end`.
    #[inline]
    pub const fn ending_at(end: isize) -> Self {
        Self { start: None, end: Some(end) }
    }

    /// Resolves the request into concrete inclusive `(start, end)` row indices for a
    /// series holding `row_count` rows.
    pub fn limits(&self, row_count: usize) -> Result<(usize, usize), RangeError> {
        if row_count == 0 {
            return Err(RangeError::Undefined);
        }

        let start = resolve_bound(self.start.unwrap_or(0), row_count)?;
        let end = match self.end {
            Some(end) => resolve_bound(end, row_count)?,
            None => row_count - 1,
        };

        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }

        Ok((start, end))
    }

    /// Number of rows covered once resolved against `row_count` rows.
    #[inline]
    pub fn n_rows(&self, row_count: usize) -> Result<usize, RangeError> {
        let (start, end) = self.limits(row_count)?;
        Ok(end - start + 1)
    }
}

fn resolve_bound(bound: isize, row_count: usize) -> Result<usize, RangeError> {
    let out_of_bounds = RangeError::OutOfBounds { bound, row_count };

    let resolved = if bound < 0 {
        row_count.checked_sub(bound.unsigned_abs()).ok_or(out_of_bounds)?
    } else {
        bound as usize
    };

    if resolved >= row_count {
        return Err(out_of_bounds);
    }

    Ok(resolved)
}
