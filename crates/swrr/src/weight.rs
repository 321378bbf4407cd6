//! The capability set shared by every selection strategy.

use crate::error::WeightResult;

/// Cleanup callback handed to [`Weight::close`].
pub type Cleanup<'a, T> = dyn FnMut(&T) -> anyhow::Result<()> + 'a;

/// A named, weighted set of candidates that hands out one payload per call
/// to [`Weight::next`].
///
/// Implementations are internally synchronized; every method takes `&self`
/// and may be called from any thread.
pub trait Weight<T>: Send + Sync {
    /// Register a candidate. Fails if `name` is already present.
    fn add(&self, name: &str, item: T, weight: i64) -> WeightResult<()>;

    /// Pick the next payload, or `None` when nothing can be picked.
    fn next(&self) -> Option<T>;

    /// Drop a candidate by name.
    fn remove(&self, name: &str) -> WeightResult<()>;

    /// Replace a candidate's nominal weight. Not an upsert.
    fn update(&self, name: &str, weight: i64) -> WeightResult<()>;

    /// Sum of nominal weights, saturating at the `i64` bounds.
    fn total(&self) -> i64;

    /// Run `cleanup` over every payload in order, stopping at the first error.
    ///
    /// Candidates stay registered. The lock is held while `cleanup` runs, so
    /// it must not call back into the same picker.
    fn close(&self, cleanup: &mut Cleanup<'_, T>) -> anyhow::Result<()>;
}

/// Sum weights without overflowing.
pub(crate) fn saturating_total(weights: impl Iterator<Item = i64>) -> i64 {
    weights.fold(0i64, i64::saturating_add)
}
