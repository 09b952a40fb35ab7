//! Task store error types.

use thiserror::Error;

/// Errors that can occur during task store operations.
///
/// Absence is not an error: lookups return `Option` and deletes or status
/// updates return `bool`.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Required field missing or empty, or a status outside the enumeration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Identifier or unique field already used by a live entity.
    #[error("{entity_type} conflict: {detail}")]
    Conflict {
        entity_type: &'static str,
        detail: String,
    },

    /// Referenced owner does not exist.
    #[error("Foreign key constraint violation: {0}")]
    ForeignKeyViolation(String),

    /// Database error outside the classified kinds.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row could not be mapped back to an entity.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// No identifiers left to assign.
    #[error("{0} identifiers exhausted")]
    Exhausted(&'static str),
}

/// Classification of a [`TaskStoreError`], independent of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    ForeignKeyViolation,
    Infrastructure,
}

impl TaskStoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a conflict error.
    pub fn conflict(entity_type: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type,
            detail: detail.into(),
        }
    }

    /// Returns the backend-independent kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::ForeignKeyViolation(_) => ErrorKind::ForeignKeyViolation,
            Self::Database(_) | Self::Corrupt(_) | Self::Exhausted(_) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
