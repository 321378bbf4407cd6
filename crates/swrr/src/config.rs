//! balancer.toml configuration parser.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WeightError, WeightResult};
use crate::random::RandomWeighted;
use crate::round_robin::RoundRobin;
use crate::smooth::SmoothWeighted;
use crate::weight::{Weight, saturating_total};

/// Which selection strategy backs the balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Smooth,
    RoundRobin,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancerConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub name: String,
    pub address: String,
    pub weight: i64,
}

impl BalancerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sum of configured weights.
    pub fn total_weight(&self) -> i64 {
        saturating_total(self.candidates.iter().map(|c| c.weight))
    }

    /// Reject empty or duplicate names and negative weights.
    ///
    /// A weight of zero is allowed: the candidate stays registered but is
    /// drained.
    pub fn validate(&self) -> WeightResult<()> {
        let mut seen = HashSet::new();
        for c in &self.candidates {
            if c.name.trim().is_empty() {
                return Err(WeightError::InvalidConfig("candidate name is empty".into()));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(WeightError::InvalidConfig(format!(
                    "duplicate candidate name: {}",
                    c.name
                )));
            }
            if c.weight < 0 {
                return Err(WeightError::InvalidConfig(format!(
                    "negative weight {} for candidate {}",
                    c.weight, c.name
                )));
            }
        }
        Ok(())
    }

    /// Validate, then build the configured picker with each candidate's
    /// address as its payload.
    pub fn build(&self) -> WeightResult<Box<dyn Weight<String>>> {
        self.validate()?;
        let picker: Box<dyn Weight<String>> = match self.strategy {
            Strategy::Smooth => Box::new(SmoothWeighted::new()),
            Strategy::RoundRobin => Box::new(RoundRobin::new()),
            Strategy::Random => Box::new(RandomWeighted::new()),
        };
        for c in &self.candidates {
            picker.add(&c.name, c.address.clone(), c.weight)?;
        }
        tracing::info!(
            strategy = ?self.strategy,
            candidates = self.candidates.len(),
            total = self.total_weight(),
            "balancer built"
        );
        Ok(picker)
    }
}
