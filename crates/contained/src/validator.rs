//! Contained resource validation.
//!
//! Checks the structural rules every stored parent must satisfy:
//!
//! 1. every contained entry has a non-empty `resourceType`
//! 2. every contained entry has a non-empty `id`, unique within the array
//! 3. every internal reference made by the parent resolves to a contained id
//!
//! Validation never fails. Problems are collected as [`ContainedIssue`]s in a
//! fixed order: per-entry field checks in array order, then duplicate ids,
//! then unresolved references.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::reference::{CONTAINED_FIELD, strip_internal_prefix};
use crate::resolver::{contained_entries, contained_id, contained_resource_type};
use crate::scanner::internal_references;

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A contained entry has no `resourceType`.
    MissingResourceType,
    /// A contained entry has no `id`.
    MissingId,
    /// Two contained entries share an id.
    DuplicateId,
    /// An internal reference has no matching contained entry.
    UnresolvedReference,
}

impl IssueKind {
    /// Returns the kebab-case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingResourceType => "missing-resource-type",
            IssueKind::MissingId => "missing-id",
            IssueKind::DuplicateId => "duplicate-id",
            IssueKind::UnresolvedReference => "unresolved-reference",
        }
    }
}

/// A single structural problem found in a parent resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainedIssue {
    /// The issue category.
    pub kind: IssueKind,
    /// Human-readable diagnostic.
    pub message: String,
    /// Location of the offending element, e.g. `contained[1].id`.
    pub expression: String,
}

impl ContainedIssue {
    fn missing_resource_type(index: usize) -> Self {
        Self {
            kind: IssueKind::MissingResourceType,
            message: format!("contained[{}] missing resourceType", index),
            expression: format!("{}[{}].resourceType", CONTAINED_FIELD, index),
        }
    }

    fn missing_id(index: usize) -> Self {
        Self {
            kind: IssueKind::MissingId,
            message: format!("contained[{}] missing id", index),
            expression: format!("{}[{}].id", CONTAINED_FIELD, index),
        }
    }

    fn duplicate_id(index: usize, id: &str) -> Self {
        Self {
            kind: IssueKind::DuplicateId,
            message: format!("Duplicate contained id: {}", id),
            expression: format!("{}[{}].id", CONTAINED_FIELD, index),
        }
    }

    fn unresolved_reference(path: &str, reference: &str) -> Self {
        Self {
            kind: IssueKind::UnresolvedReference,
            message: format!(
                "Internal reference {} not found in contained resources",
                reference
            ),
            expression: path.to_string(),
        }
    }
}

impl fmt::Display for ContainedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a parent's contained resources and returns typed issues.
///
/// A resource without a `contained` array (or with an empty one) has no
/// issues.
pub fn validate_issues(resource: &Value) -> Vec<ContainedIssue> {
    let entries = contained_entries(resource);
    if entries.is_empty() {
        return Vec::new();
    }

    let mut issues = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if contained_resource_type(entry).is_none() {
            issues.push(ContainedIssue::missing_resource_type(index));
        }
        if contained_id(entry).is_none() {
            issues.push(ContainedIssue::missing_id(index));
        }
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(id) = contained_id(entry) {
            if !seen.insert(id) {
                issues.push(ContainedIssue::duplicate_id(index, id));
            }
        }
    }

    for found in internal_references(resource) {
        let target = strip_internal_prefix(&found.value);
        if !seen.contains(target) {
            issues.push(ContainedIssue::unresolved_reference(&found.path, &found.value));
        }
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "contained validation found issues");
    }

    issues
}

/// Validates a parent's contained resources and returns the issue messages.
///
/// An empty result means the resource is valid.
///
/// # Example
///
/// ```
/// use nest_contained::validate;
/// use serde_json::json;
///
/// let request = json!({
///     "resourceType": "MedicationRequest",
///     "contained": [{"resourceType": "Medication", "id": "med1"}],
///     "medicationReference": {"reference": "#med2"}
/// });
///
/// assert_eq!(
///     validate(&request),
///     vec!["Internal reference #med2 not found in contained resources"]
/// );
/// ```
pub fn validate(resource: &Value) -> Vec<String> {
    validate_issues(resource)
        .into_iter()
        .map(|issue| issue.message)
        .collect()
}

/// Returns `true` if the resource has no contained issues.
pub fn is_valid(resource: &Value) -> bool {
    validate_issues(resource).is_empty()
}
