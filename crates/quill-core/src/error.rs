//! Domain-level error types.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::ports::AuthError;

/// Per-field validation messages, keyed by input field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Domain errors - business logic failures.
///
/// The set is closed so callers can branch on the kind instead of parsing
/// messages.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Authentication required: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("Invalid input: {}", summarize(.errors))]
    InvalidInput { errors: FieldErrors },

    #[error("Conflict on {field}: {message}")]
    Conflict { field: &'static str, message: String },

    #[error("Entity not found: {entity_type} {key}")]
    NotFound { entity_type: &'static str, key: String },

    #[error("Action not allowed")]
    Forbidden,

    #[error("{entity_type} {id} was modified concurrently")]
    Stale { entity_type: &'static str, id: Uuid },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Post",
            key: key.to_string(),
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        Self::Internal(err.to_string())
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

    #[error("Stored version does not match the expected version")]
    VersionMismatch,
}
