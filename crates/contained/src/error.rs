//! Error types for contained resource editing.
//!
//! Only the mutation operations in [`crate::mutator`] fail with these errors.
//! Structural problems found during validation are reported as
//! [`ContainedIssue`](crate::validator::ContainedIssue) values instead.

use thiserror::Error;

/// A requested edit of a `contained` array that cannot be honored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainedError {
    /// The new entry has no `id` and automatic id assignment was not requested.
    #[error("contained resource has no id and automatic id assignment is disabled")]
    MissingId,

    /// The candidate id is already used by another entry of the same parent.
    #[error("contained id already exists: {id}")]
    DuplicateId {
        /// The colliding id.
        id: String,
    },

    /// No entry with the given id exists in the parent.
    #[error("contained resource not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The entry is the target of an internal reference elsewhere in the parent.
    #[error("contained resource {id} is still referenced at {}", paths.join(", "))]
    StillReferenced {
        /// The id of the entry that was to be removed.
        id: String,
        /// Locations of the references that still target it.
        paths: Vec<String>,
    },

    /// The value handed in as a parent or contained entry is not a JSON object.
    #[error("{what} must be a JSON object")]
    NotAnObject {
        /// What the value was supposed to be.
        what: &'static str,
    },
}

impl ContainedError {
    /// Returns the contained id this error is about, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            ContainedError::DuplicateId { id }
            | ContainedError::NotFound { id }
            | ContainedError::StillReferenced { id, .. } => Some(id),
            ContainedError::MissingId | ContainedError::NotAnObject { .. } => None,
        }
    }
}

/// Result type alias for contained mutation operations.
pub type ContainedResult<T> = Result<T, ContainedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display_names_id() {
        let err = ContainedError::DuplicateId {
            id: "med1".to_string(),
        };
        assert_eq!(err.to_string(), "contained id already exists: med1");
        assert_eq!(err.id(), Some("med1"));
    }

    #[test]
    fn test_still_referenced_display() {
        let err = ContainedError::StillReferenced {
            id: "med1".to_string(),
            paths: vec![
                "medicationReference.reference".to_string(),
                "note[0].authorReference.reference".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("still referenced"));
        assert!(msg.contains("med1"));
        assert!(msg.contains("medicationReference.reference, note[0]"));
    }

    #[test]
    fn test_missing_id_has_no_operand() {
        assert_eq!(ContainedError::MissingId.id(), None);
    }
}
