//! Error types for the persistence layer.
//!
//! Storage failures are grouped by category: resource state, concurrency,
//! validation of what was handed to the backend, and the backend itself.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Concurrency and versioning errors
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("resource not found: {resource_type}/{id}")]
    NotFound { resource_type: String, id: String },

    /// A resource with the given ID already exists.
    #[error("resource already exists: {resource_type}/{id}")]
    AlreadyExists { resource_type: String, id: String },

    /// The resource has been deleted (HTTP 410 Gone).
    #[error("resource deleted: {resource_type}/{id}")]
    Gone {
        resource_type: String,
        id: String,
        deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    },
}

/// Errors related to concurrency control.
#[derive(Error, Debug)]
pub enum ConcurrencyError {
    /// Version conflict detected during optimistic locking.
    #[error("version conflict: expected {expected_version}, found {actual_version}")]
    VersionConflict {
        resource_type: String,
        id: String,
        expected_version: String,
        actual_version: String,
    },
}

/// Errors related to the content handed to the backend.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The resource cannot be stored as given.
    #[error("invalid resource: {message}")]
    InvalidResource { message: String },
}

/// Errors originating from the storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            resource_type: "MedicationRequest".to_string(),
            id: "rx1".to_string(),
        });
        assert_eq!(err.to_string(), "resource not found: MedicationRequest/rx1");
    }

    #[test]
    fn test_concurrency_error_display() {
        let err = ConcurrencyError::VersionConflict {
            resource_type: "Observation".to_string(),
            id: "o1".to_string(),
            expected_version: "1".to_string(),
            actual_version: "2".to_string(),
        };
        assert_eq!(err.to_string(), "version conflict: expected 1, found 2");
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StorageError = parse_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }
}
