//! Plain round-robin over registered candidates.
//!
//! Weights are stored (and summed by `total`) but do not influence picking.
//! Selection only needs a shared lock: the cursor is an atomic counter that
//! wraps around the current candidate count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::error::{WeightError, WeightResult};
use crate::weight::{Cleanup, Weight, saturating_total};

struct Entry<T> {
    name: String,
    item: T,
    weight: i64,
}

/// Round-robin picker with the same membership API as
/// [`SmoothWeighted`](crate::SmoothWeighted).
pub struct RoundRobin<T> {
    entries: RwLock<Vec<Entry<T>>>,
    counter: AtomicUsize,
}

impl<T> RoundRobin<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    /// Reset the cursor to the first candidate.
    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }

    /// Current counter value (for diagnostics).
    pub fn current(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Entry<T>>> {
        self.entries.read().expect("entries lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Entry<T>>> {
        self.entries.write().expect("entries lock")
    }
}

impl<T> Default for RoundRobin<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Weight<T> for RoundRobin<T> {
    fn add(&self, name: &str, item: T, weight: i64) -> WeightResult<()> {
        let mut entries = self.write();
        if entries.iter().any(|e| e.name == name) {
            return Err(WeightError::Duplicate(name.to_string()));
        }
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        entries.push(Entry {
            name: name.to_string(),
            item,
            weight,
        });
        debug!(candidate = name, count = entries.len(), "round-robin candidate added");
        Ok(())
    }

    fn next(&self) -> Option<T> {
        let entries = self.read();
        if entries.is_empty() {
            return None;
        }
        let idx = self.counter.fetch_add(1, Ordering::Relaxed) % entries.len();
        Some(entries[idx].item.clone())
    }

    fn remove(&self, name: &str) -> WeightResult<()> {
        let mut entries = self.write();
        if entries.is_empty() {
            return Err(WeightError::Empty);
        }
        let idx = entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| WeightError::NotFound(name.to_string()))?;
        entries.remove(idx);
        debug!(candidate = name, count = entries.len(), "round-robin candidate removed");
        Ok(())
    }

    fn update(&self, name: &str, weight: i64) -> WeightResult<()> {
        let mut entries = self.write();
        if entries.is_empty() {
            return Err(WeightError::Empty);
        }
        let entry = entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| WeightError::NotFound(name.to_string()))?;
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        entry.weight = weight;
        Ok(())
    }

    fn total(&self) -> i64 {
        saturating_total(self.read().iter().map(|e| e.weight))
    }

    fn close(&self, cleanup: &mut Cleanup<'_, T>) -> anyhow::Result<()> {
        let entries = self.write();
        for e in entries.iter() {
            cleanup(&e.item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(names: &[&'static str]) -> RoundRobin<&'static str> {
        let rr = RoundRobin::new();
        for &name in names {
            rr.add(name, name, 1).unwrap();
        }
        rr
    }

    #[test]
    fn round_robin_cycles_in_insertion_order() {
        let rr = picker(&["a", "b", "c"]);

        assert_eq!(rr.next(), Some("a"));
        assert_eq!(rr.next(), Some("b"));
        assert_eq!(rr.next(), Some("c"));
        assert_eq!(rr.next(), Some("a")); // wraps
    }

    #[test]
    fn round_robin_empty_returns_none() {
        let rr: RoundRobin<&str> = RoundRobin::new();
        assert_eq!(rr.next(), None);
        assert_eq!(rr.remove("a"), Err(WeightError::Empty));
        assert_eq!(rr.update("a", 1), Err(WeightError::Empty));
    }

    #[test]
    fn round_robin_ignores_weights_for_picking() {
        let rr = RoundRobin::new();
        rr.add("heavy", "heavy", 10).unwrap();
        rr.add("light", "light", 1).unwrap();

        assert_eq!(rr.total(), 11);
        assert_eq!(rr.next(), Some("heavy"));
        assert_eq!(rr.next(), Some("light"));
    }

    #[test]
    fn round_robin_reset() {
        let rr = picker(&["a", "b", "c"]);

        rr.next();
        rr.next();
        assert_eq!(rr.current(), 2);

        rr.reset();
        assert_eq!(rr.current(), 0);
        assert_eq!(rr.next(), Some("a"));
    }

    #[test]
    fn round_robin_adapts_to_membership_changes() {
        let rr = picker(&["a", "b"]);
        assert_eq!(rr.next(), Some("a"));
        assert_eq!(rr.next(), Some("b"));

        rr.add("c", "c", 1).unwrap();
        rr.add("d", "d", 1).unwrap();
        assert_eq!(rr.next(), Some("c"));
        assert_eq!(rr.next(), Some("d"));

        rr.remove("d").unwrap();
        // counter = 4, three candidates left
        assert_eq!(rr.next(), Some("b"));
    }

    #[test]
    fn round_robin_update_and_duplicate() {
        let rr = picker(&["a"]);
        assert_eq!(rr.add("a", "a", 2), Err(WeightError::Duplicate("a".into())));
        rr.update("a", 7).unwrap();
        assert_eq!(rr.total(), 7);
        assert_eq!(rr.update("zz", 1), Err(WeightError::NotFound("zz".into())));
    }

    #[test]
    fn round_robin_total_saturates() {
        let rr = RoundRobin::new();
        rr.add("a", "a", i64::MAX).unwrap();
        rr.add("b", "b", i64::MAX).unwrap();
        assert_eq!(rr.total(), i64::MAX);
    }

    #[test]
    fn round_robin_concurrent_safety() {
        use std::sync::Arc;
        use std::thread;

        let rr = Arc::new(picker(&["a", "b", "c", "d"]));
        let mut handles = vec![];

        for _ in 0..4 {
            let rr = rr.clone();
            handles.push(thread::spawn(move || {
                (0..100).map(|_| rr.next().unwrap()).collect::<Vec<_>>()
            }));
        }

        let mut all = vec![];
        for h in handles {
            all.extend(h.join().unwrap());
        }

        assert_eq!(rr.current(), 400);
        for name in ["a", "b", "c", "d"] {
            assert_eq!(all.iter().filter(|n| **n == name).count(), 100);
        }
    }
}
