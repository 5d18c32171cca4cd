//! Write-path admission for resources carrying contained entries.
//!
//! Every create or update passes through [`admit`]: contained ids are
//! normalized first, then the result is validated. A resource with any
//! issue is refused as a whole.

use thiserror::Error;
use tracing::warn;

use serde_json::Value;

use crate::normalize::normalize;
use crate::validator::{ContainedIssue, validate_issues};

/// A write refused because the resource's contained entries are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("contained validation failed: {}", join_messages(.issues))]
pub struct RejectedWrite {
    /// Every issue found, in validation order. Never empty.
    pub issues: Vec<ContainedIssue>,
}

impl RejectedWrite {
    /// Returns the issue messages in order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }
}

fn join_messages(issues: &[ContainedIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Normalizes and validates a resource about to be written.
///
/// Returns the normalized resource when it has no contained issues. The
/// normalization is what gets stored, so ids like `#med1` never reach the
/// backend.
///
/// # Example
///
/// ```
/// use nest_contained::admit;
/// use serde_json::json;
///
/// let stored = admit(json!({
///     "resourceType": "MedicationRequest",
///     "contained": [{"resourceType": "Medication", "id": "#med1"}],
///     "medicationReference": {"reference": "#med1"}
/// }))
/// .unwrap();
/// assert_eq!(stored["contained"][0]["id"], "med1");
///
/// let rejected = admit(json!({
///     "resourceType": "MedicationRequest",
///     "contained": [{"resourceType": "Medication", "id": "med1"}],
///     "medicationReference": {"reference": "#med2"}
/// }))
/// .unwrap_err();
/// assert_eq!(rejected.issues.len(), 1);
/// ```
pub fn admit(resource: Value) -> Result<Value, RejectedWrite> {
    let normalized = normalize(resource);
    let issues = validate_issues(&normalized);

    if issues.is_empty() {
        return Ok(normalized);
    }

    let resource_type = normalized
        .get("resourceType")
        .and_then(|rt| rt.as_str())
        .unwrap_or("<unknown>");
    warn!(
        resource_type,
        issues = issues.len(),
        first = %issues[0],
        "Rejected write with invalid contained resources"
    );
    Err(RejectedWrite { issues })
}
