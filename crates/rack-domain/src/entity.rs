//! Core Entity Trait
//!
//! Basic contract for all domain entities: a unique, hashable ID.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    /// Message safe to show in a notice, without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::NotFound(msg) | DomainError::InvalidInput(msg) | DomainError::Conflict(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_category() {
        let err = DomainError::InvalidInput("rows must be between 1 and 20".to_string());
        assert_eq!(err.to_string(), "Invalid input: rows must be between 1 and 20");
        assert_eq!(err.detail(), "rows must be between 1 and 20");
    }
}
