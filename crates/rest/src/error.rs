//! Error types for the FHIR REST API.
//!
//! This module defines all error types used throughout the REST API layer,
//! with automatic conversion to FHIR OperationOutcome responses.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status | FHIR Issue Code |
//! |--------|-------------|-----------------|
//! | Resource NotFound | 404 | not-found |
//! | Contained NotFound | 404 | not-found |
//! | Resource Gone | 410 | deleted |
//! | VersionConflict / AlreadyExists | 409 | conflict |
//! | Contained DuplicateId | 409 | duplicate |
//! | Contained StillReferenced | 409 | conflict |
//! | If-Match mismatch | 412 | conflict |
//! | Contained MissingId | 400 | required |
//! | Rejected write | 400 | per issue |
//! | Invalid JSON / resource | 400 | invalid |
//! | Unsupported Content-Type | 415 | not-supported |
//! | Backend failure | 500 | exception |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nest_contained::{ContainedError, ContainedIssue, IssueKind, RejectedWrite};
use nest_persistence::error::{
    BackendError, ConcurrencyError, ResourceError, StorageError, ValidationError,
};
use std::fmt;

use crate::responses::operation_outcome::{Issue, IssueType, OperationOutcomeBuilder};

/// The primary error type for REST API operations.
///
/// This enum provides semantic error types that map cleanly to HTTP status codes
/// and FHIR OperationOutcome issue codes.
#[derive(Debug)]
pub enum RestError {
    /// Resource not found (HTTP 404).
    NotFound {
        /// The resource type (e.g., "MedicationRequest").
        resource_type: String,
        /// The resource ID.
        id: String,
    },

    /// No contained entry with this id in the parent (HTTP 404).
    ContainedNotFound {
        /// The contained id, without `#`.
        id: String,
    },

    /// Resource was deleted (HTTP 410 Gone).
    Gone {
        /// The resource type.
        resource_type: String,
        /// The resource ID.
        id: String,
    },

    /// Version conflict during update (HTTP 409).
    VersionConflict {
        /// The resource type.
        resource_type: String,
        /// The resource ID.
        id: String,
        /// Message describing the conflict.
        message: String,
    },

    /// Contained id already taken in the parent (HTTP 409).
    DuplicateContainedId {
        /// The colliding id.
        id: String,
    },

    /// Contained entry is still the target of an internal reference (HTTP 409).
    StillReferenced {
        /// The contained id.
        id: String,
        /// Locations of the referencing elements.
        paths: Vec<String>,
    },

    /// Precondition failed - If-Match (HTTP 412).
    PreconditionFailed {
        /// Message describing why the precondition failed.
        message: String,
    },

    /// Bad request - malformed input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// A required element is missing (HTTP 400).
    Required {
        /// Error message.
        message: String,
    },

    /// The write was refused by contained validation (HTTP 400).
    Validation {
        /// Every issue found. Never empty.
        issues: Vec<ContainedIssue>,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } | RestError::ContainedNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::Gone { .. } => StatusCode::GONE,
            RestError::VersionConflict { .. }
            | RestError::DuplicateContainedId { .. }
            | RestError::StillReferenced { .. } => StatusCode::CONFLICT,
            RestError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            RestError::BadRequest { .. }
            | RestError::Required { .. }
            | RestError::Validation { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the OperationOutcome issues describing this error.
    fn issues(&self) -> Vec<Issue> {
        let message = self.to_string();
        match self {
            RestError::Validation { issues } => issues.iter().map(validation_issue).collect(),
            RestError::StillReferenced { paths, .. } => {
                let issue = paths.iter().fold(
                    Issue::error(IssueType::Conflict, &message).with_diagnostics(&message),
                    |issue, path| issue.with_expression(path),
                );
                vec![issue]
            }
            _ => {
                let code = match self {
                    RestError::NotFound { .. } | RestError::ContainedNotFound { .. } => {
                        IssueType::NotFound
                    }
                    RestError::Gone { .. } => IssueType::Deleted,
                    RestError::VersionConflict { .. } | RestError::PreconditionFailed { .. } => {
                        IssueType::Conflict
                    }
                    RestError::DuplicateContainedId { .. } => IssueType::Duplicate,
                    RestError::Required { .. } => IssueType::Required,
                    RestError::UnsupportedMediaType { .. } => IssueType::NotSupported,
                    RestError::InternalError { .. } => IssueType::Exception,
                    _ => IssueType::Invalid,
                };
                vec![Issue::error(code, &message).with_diagnostics(&message)]
            }
        }
    }
}

fn validation_issue(issue: &ContainedIssue) -> Issue {
    let code = match issue.kind {
        IssueKind::MissingResourceType | IssueKind::MissingId => IssueType::Required,
        IssueKind::DuplicateId => IssueType::Duplicate,
        IssueKind::UnresolvedReference => IssueType::NotFound,
    };

    Issue::error(code, &issue.message)
        .with_diagnostics(&issue.message)
        .with_expression(&issue.expression)
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource_type, id } => {
                write!(f, "Resource not found: {}/{}", resource_type, id)
            }
            RestError::ContainedNotFound { id } => {
                write!(f, "Contained resource not found: {}", id)
            }
            RestError::Gone { resource_type, id } => {
                write!(f, "Resource deleted: {}/{}", resource_type, id)
            }
            RestError::VersionConflict { message, .. } => {
                write!(f, "Version conflict: {}", message)
            }
            RestError::DuplicateContainedId { id } => {
                write!(f, "Contained id already exists: {}", id)
            }
            RestError::StillReferenced { id, paths } => {
                write!(
                    f,
                    "Contained resource {} is still referenced at {}",
                    id,
                    paths.join(", ")
                )
            }
            RestError::PreconditionFailed { message } => {
                write!(f, "Precondition failed: {}", message)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::Required { message } => {
                write!(f, "Required: {}", message)
            }
            RestError::Validation { issues } => {
                let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
                write!(f, "Contained validation failed: {}", messages.join("; "))
            }
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let outcome = self
            .issues()
            .into_iter()
            .fold(OperationOutcomeBuilder::new(), |builder, issue| {
                builder.add_issue(issue)
            })
            .build();

        (self.status_code(), Json(outcome)).into_response()
    }
}

// Conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Concurrency(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { resource_type, id } => {
                RestError::NotFound { resource_type, id }
            }
            ResourceError::AlreadyExists { resource_type, id } => RestError::VersionConflict {
                message: format!("Resource {}/{} already exists", resource_type, id),
                resource_type,
                id,
            },
            ResourceError::Gone {
                resource_type, id, ..
            } => RestError::Gone { resource_type, id },
        }
    }
}

impl From<ConcurrencyError> for RestError {
    fn from(err: ConcurrencyError) -> Self {
        match err {
            ConcurrencyError::VersionConflict {
                resource_type,
                id,
                expected_version,
                actual_version,
            } => RestError::VersionConflict {
                resource_type,
                id,
                message: format!(
                    "Expected version {}, but found {}",
                    expected_version, actual_version
                ),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidResource { message } => RestError::BadRequest { message },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

// Conversions from contained editing errors

impl From<ContainedError> for RestError {
    fn from(err: ContainedError) -> Self {
        match err {
            ContainedError::MissingId => RestError::Required {
                message: err.to_string(),
            },
            ContainedError::DuplicateId { id } => RestError::DuplicateContainedId { id },
            ContainedError::NotFound { id } => RestError::ContainedNotFound { id },
            ContainedError::StillReferenced { id, paths } => {
                RestError::StillReferenced { id, paths }
            }
            ContainedError::NotAnObject { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
        }
    }
}

impl From<RejectedWrite> for RestError {
    fn from(err: RejectedWrite) -> Self {
        RestError::Validation { issues: err.issues }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
