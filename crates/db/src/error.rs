//! Store and lifecycle error types.

use thiserror::Error;

/// Resource store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Lifecycle controller errors.
///
/// `resource` carries the descriptor label (`"Author"`, `"Book"`) so callers
/// can render messages without knowing the record type.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid fields: {0}")]
    InvalidFields(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{resource} {id} is already active")]
    AlreadyActive { resource: &'static str, id: i64 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Whether the caller supplied an unusable field set.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::InvalidFields(_))
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_names() {
        let err = LifecycleError::MissingFields(vec!["name", "email"]);
        assert_eq!(err.to_string(), "missing required fields: name, email");
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_is_not_validation() {
        let err = LifecycleError::NotFound {
            resource: "Book",
            id: 7,
        };
        assert_eq!(err.to_string(), "Book 7 not found");
        assert!(!err.is_validation());
    }
}
