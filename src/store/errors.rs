//! Store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the row source. Not-found is never an error here: lookups
/// report it through `Option`/`bool` results so handlers decide the status.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Any failure reported by PostgreSQL or the pool
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referential constraint violated (in-memory store)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// An armed fault point was reached inside a write
    #[error("Fault injected at {0}")]
    FaultInjected(&'static str),
}

impl StoreError {
    pub fn constraint(msg: impl Into<String>) -> Self {
        StoreError::Constraint(msg.into())
    }

    /// True when the error came from an armed fault point.
    pub fn is_injected(&self) -> bool {
        matches!(self, StoreError::FaultInjected(_))
    }
}
