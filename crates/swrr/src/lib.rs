//! swrr — weighted candidate selection.
//!
//! A [`Weight`] holds a dynamic set of named candidates, each with an
//! integer weight and an opaque payload, and hands out one payload per
//! call to [`Weight::next`]. Strategies:
//!
//! - **`smooth`** — smooth weighted round-robin (proportional and evenly spaced)
//! - **`round_robin`** — plain rotation, weights ignored for picking
//! - **`random`** — weighted lottery
//!
//! [`BalancerConfig`] builds any of them from a TOML file.
//!
//! # Example
//!
//! ```
//! use swrr::{SmoothWeighted, Weight};
//!
//! let picker = SmoothWeighted::new();
//! picker.add("a", "10.0.0.1:80", 5).unwrap();
//! picker.add("b", "10.0.0.2:80", 1).unwrap();
//!
//! let picks: Vec<_> = (0..6).filter_map(|_| picker.next()).collect();
//! assert_eq!(picks.iter().filter(|p| *p == &"10.0.0.2:80").count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod random;
pub mod round_robin;
pub mod smooth;
pub mod weight;

pub use config::{BalancerConfig, CandidateConfig, Strategy};
pub use error::{WeightError, WeightResult};
pub use random::RandomWeighted;
pub use round_robin::RoundRobin;
pub use smooth::{CandidateStats, SmoothWeighted};
pub use weight::{Cleanup, Weight};
