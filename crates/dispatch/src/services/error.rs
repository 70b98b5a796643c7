//! Error taxonomy for dispatch operations.

use thiserror::Error;

use taxi_dispatch_core::{TextError, TransitionError};

use crate::db::RepositoryError;

/// Errors that can occur while serving an operator request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A required form field is missing or malformed.
    #[error("invalid field '{field}': {reason}")]
    Validation {
        /// Form field name as submitted.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "order".
        entity: &'static str,
        /// Requested ID as given, which may not even be numeric.
        id: String,
    },

    /// The operation is not allowed in the record's current state.
    #[error("{0}")]
    BusinessRule(String),

    /// The store is unavailable or a write failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl DispatchError {
    /// Build a validation error for a field that was not submitted.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::Validation {
            field,
            reason: "is required".to_string(),
        }
    }

    /// Build a not-found error for `entity` with the given ID.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Build a validation error for a field that failed text validation.
    #[must_use]
    pub fn invalid_text(field: &'static str, err: &TextError) -> Self {
        Self::Validation {
            field,
            reason: err.to_string(),
        }
    }

    /// Short machine-readable kind, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::BusinessRule(_) => "business_rule",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<TransitionError> for DispatchError {
    fn from(err: TransitionError) -> Self {
        Self::BusinessRule(capitalize(&err.to_string()))
    }
}

impl From<sqlx::Error> for DispatchError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(RepositoryError::Database(err))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
