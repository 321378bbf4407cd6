//! Lottery selection: each pick is an independent weighted draw.
//!
//! Long-run shares match the weights, but unlike [`SmoothWeighted`] there is
//! no spacing guarantee between consecutive wins.
//!
//! [`SmoothWeighted`]: crate::SmoothWeighted

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{WeightError, WeightResult};
use crate::weight::{Cleanup, Weight, saturating_total};

struct Ticket<T> {
    name: String,
    item: T,
    weight: i64,
}

/// Weighted random picker. Candidates with weight <= 0 hold no tickets.
pub struct RandomWeighted<T> {
    tickets: RwLock<Vec<Ticket<T>>>,
}

impl<T> RandomWeighted<T> {
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Ticket<T>>> {
        self.tickets.read().expect("tickets lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Ticket<T>>> {
        self.tickets.write().expect("tickets lock")
    }
}

impl<T> Default for RandomWeighted<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a draw in `0..sum(positive weights)` onto the candidate owning it.
///
/// Tallies in `u128`: even `i64::MAX` tickets for every candidate cannot
/// overflow it.
fn draw<'a, T, R: Rng>(tickets: &'a [Ticket<T>], rng: &mut R) -> Option<&'a Ticket<T>> {
    let total: u128 = tickets.iter().map(|t| t.weight.max(0) as u128).sum();
    if total == 0 {
        return None;
    }

    let pick = rng.gen_range(0..total);
    let mut acc: u128 = 0;
    for ticket in tickets {
        acc += ticket.weight.max(0) as u128;
        if pick < acc {
            return Some(ticket);
        }
    }
    None
}

impl<T: Clone + Send + Sync> Weight<T> for RandomWeighted<T> {
    fn add(&self, name: &str, item: T, weight: i64) -> WeightResult<()> {
        let mut tickets = self.write();
        if tickets.iter().any(|t| t.name == name) {
            return Err(WeightError::Duplicate(name.to_string()));
        }
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        tickets.push(Ticket {
            name: name.to_string(),
            item,
            weight,
        });
        debug!(candidate = name, weight, "lottery candidate added");
        Ok(())
    }

    fn next(&self) -> Option<T> {
        let tickets = self.read();
        draw(&tickets, &mut rand::thread_rng()).map(|t| t.item.clone())
    }

    fn remove(&self, name: &str) -> WeightResult<()> {
        let mut tickets = self.write();
        if tickets.is_empty() {
            return Err(WeightError::Empty);
        }
        let idx = tickets
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| WeightError::NotFound(name.to_string()))?;
        tickets.remove(idx);
        Ok(())
    }

    fn update(&self, name: &str, weight: i64) -> WeightResult<()> {
        let mut tickets = self.write();
        if tickets.is_empty() {
            return Err(WeightError::Empty);
        }
        let ticket = tickets
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| WeightError::NotFound(name.to_string()))?;
        if weight <= 0 {
            warn!(candidate = name, weight, "non-positive weight accepted");
        }
        ticket.weight = weight;
        Ok(())
    }

    fn total(&self) -> i64 {
        saturating_total(self.read().iter().map(|t| t.weight))
    }

    fn close(&self, cleanup: &mut Cleanup<'_, T>) -> anyhow::Result<()> {
        let tickets = self.write();
        for t in tickets.iter() {
            cleanup(&t.item)?;
        }
        Ok(())
    }
}
