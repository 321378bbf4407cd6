//! Smooth weighted round-robin.
//!
//! Each call to [`SmoothWeighted::next`] runs one round: every candidate's
//! effective weight is added to its `current` accumulator, the candidate with
//! the largest accumulator wins, and the winner is pushed back by the sum of
//! effective weights for that round. With fixed weights, any `total()`
//! consecutive picks select each candidate exactly `weight` times, and a
//! heavy candidate's wins are spread out between the lighter ones instead of
//! being handed out back to back.
//!
//! A candidate's effective weight may be lowered with
//! [`SmoothWeighted::degrade`]; it climbs back by one per round until it
//! reaches the nominal weight again.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{WeightError, WeightResult};
use crate::weight::{Cleanup, Weight, saturating_total};

/// Per-candidate selection state.
struct Candidate<T> {
    name: String,
    item: T,
    /// Nominal weight set by `add` / `update`.
    weight: i64,
    /// Usable weight; below `weight` only while recovering from `degrade`.
    effective: i64,
    /// Running accumulator, rebased by the round total on every win.
    current: i64,
}

impl<T> Candidate<T> {
    fn new(name: &str, item: T, weight: i64) -> Self {
        Self {
            name: name.to_string(),
            item,
            weight,
            effective: weight,
            current: 0,
        }
    }
}

/// Point-in-time view of one candidate, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStats {
    pub name: String,
    pub weight: i64,
    pub effective_weight: i64,
    pub current_weight: i64,
}

/// Smooth weighted round-robin picker.
///
/// All operations, including `next`, take the same exclusive lock: picking
/// mutates every candidate's accumulator.
pub struct SmoothWeighted<T> {
    candidates: Mutex<Vec<Candidate<T>>>,
}

impl<T> SmoothWeighted<T> {
    /// Create an empty picker.
    pub fn new() -> Self {
        Self {
            candidates: Mutex::new(Vec::new()),
        }
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().iter().any(|c| c.name == name)
    }

    /// Copy out the selection state of every candidate in insertion order.
    pub fn snapshot(&self) -> Vec<CandidateStats> {
        self.lock()
            .iter()
            .map(|c| CandidateStats {
                name: c.name.clone(),
                weight: c.weight,
                effective_weight: c.effective,
                current_weight: c.current,
            })
            .collect()
    }

    /// Lower a candidate's effective weight by `amount`.
    ///
    /// The effective weight stays within `min(0, weight)..=weight`. It
    /// recovers by one on each subsequent `next` until it is back at
    /// `weight`. A negative `amount` is rejected.
    pub fn degrade(&self, name: &str, amount: i64) -> WeightResult<()> {
        if amount < 0 {
            return Err(WeightError::NegativeAmount(amount));
        }
        let mut candidates = self.lock();
        let candidate = find_mut(&mut candidates, name)?;
        let floor = candidate.weight.min(0);
        candidate.effective = candidate
            .effective
            .saturating_sub(amount)
            .clamp(floor, candidate.weight);
        debug!(
            candidate = name,
            effective = candidate.effective,
            weight = candidate.weight,
            "candidate degraded"
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Candidate<T>>> {
        self.candidates.lock().expect("candidates lock")
    }
}

impl<T> Default for SmoothWeighted<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut<'a, T>(
    candidates: &'a mut [Candidate<T>],
    name: &str,
) -> WeightResult<&'a mut Candidate<T>> {
    if candidates.is_empty() {
        return Err(WeightError::Empty);
    }
    candidates
        .iter_mut()
        .find(|c| c.name == name)
        .ok_or_else(|| WeightError::NotFound(name.to_string()))
}

impl<T: Clone + Send> Weight<T> for SmoothWeighted<T> {
    fn add(&self, name: &str, item: T, weight: i64) -> WeightResult<()> {
        let mut candidates = self.lock();
        if candidates.iter().any(|c| c.name == name) {
            return Err(WeightError::Duplicate(name.to_string()));
        }
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        candidates.push(Candidate::new(name, item, weight));
        debug!(candidate = name, weight, count = candidates.len(), "candidate added");
        Ok(())
    }

    fn next(&self) -> Option<T> {
        let mut candidates = self.lock();

        let mut total: i64 = 0;
        let mut best: Option<(usize, i64)> = None;
        for (idx, c) in candidates.iter_mut().enumerate() {
            total = total.saturating_add(c.effective);
            // Saturate: a negative-weight candidate drifts down forever.
            c.current = c.current.saturating_add(c.effective);
            if c.effective < c.weight {
                c.effective += 1;
            }
            // Strict comparison on the accumulator: the earliest maximum wins ties.
            if best.map_or(true, |(_, current)| c.current > current) {
                best = Some((idx, c.current));
            }
        }

        let (idx, _) = best?;
        let winner = &mut candidates[idx];
        winner.current = winner.current.saturating_sub(total);
        Some(winner.item.clone())
    }

    fn remove(&self, name: &str) -> WeightResult<()> {
        let mut candidates = self.lock();
        if candidates.is_empty() {
            return Err(WeightError::Empty);
        }
        let idx = candidates
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| WeightError::NotFound(name.to_string()))?;
        candidates.remove(idx);
        debug!(candidate = name, count = candidates.len(), "candidate removed");
        Ok(())
    }

    fn update(&self, name: &str, weight: i64) -> WeightResult<()> {
        let mut candidates = self.lock();
        let candidate = find_mut(&mut candidates, name)?;
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        candidate.weight = weight;
        candidate.effective = weight;
        candidate.current = 0;
        debug!(candidate = name, weight, "candidate weight updated");
        Ok(())
    }

    fn total(&self) -> i64 {
        saturating_total(self.lock().iter().map(|c| c.weight))
    }

    fn close(&self, cleanup: &mut Cleanup<'_, T>) -> anyhow::Result<()> {
        let candidates = self.lock();
        for c in candidates.iter() {
            if let Err(err) = cleanup(&c.item) {
                warn!(candidate = %c.name, error = %err, "cleanup failed, stopping close");
                return Err(err);
            }
        }
        debug!(count = candidates.len(), "picker closed");
        Ok(())
    }
}
