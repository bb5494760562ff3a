/// Inclusive value bounds of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInterval<V> {
    pub lower: V,
    pub upper: V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Rows equal to `lower`.
    Equality,
    /// Rows with `lower <= value <= upper`.
    Range,
}

impl<V: PartialEq> SearchInterval<V> {
    pub fn new(lower: V, upper: V) -> Self {
        Self { lower, upper }
    }

    /// Structurally equal bounds search for a single value instead of a range.
    #[inline]
    pub fn mode(&self) -> SearchMode {
        if self.lower == self.upper {
            SearchMode::Equality
        } else {
            SearchMode::Range
        }
    }
}
