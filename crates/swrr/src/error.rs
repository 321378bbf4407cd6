//! Picker error types.

use thiserror::Error;

/// Errors returned by membership and weight operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("candidate already exists: {0}")]
    Duplicate(String),

    #[error("candidate not found: {0}")]
    NotFound(String),

    #[error("no candidates registered")]
    Empty,

    #[error("degrade amount must not be negative: {0}")]
    NegativeAmount(i64),

    #[error("invalid balancer config: {0}")]
    InvalidConfig(String),
}

pub type WeightResult<T> = Result<T, WeightError>;
