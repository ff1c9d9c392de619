//! Domain-level error types.

use thiserror::Error;
use validator::ValidationErrors;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type}")]
    NotFound { entity_type: &'static str },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str) -> Self {
        Self::NotFound { entity_type }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
