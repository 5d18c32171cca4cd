//! Contained resource lookup.
//!
//! Accessors for a parent's `contained` array and resolution of internal
//! references against it. All functions here are read-only.

use serde_json::Value;

use crate::reference::{CONTAINED_FIELD, Reference, strip_internal_prefix};

/// Returns the entries of the parent's `contained` array.
///
/// A missing field, or a `contained` value that is not an array, yields an
/// empty slice.
pub fn contained_entries(resource: &Value) -> &[Value] {
    resource
        .get(CONTAINED_FIELD)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Returns the normalized id of a contained entry.
///
/// The `#` prefix is stripped. Missing, non-string and empty ids yield `None`.
pub fn contained_id(entry: &Value) -> Option<&str> {
    entry
        .get("id")
        .and_then(Value::as_str)
        .map(strip_internal_prefix)
        .filter(|id| !id.is_empty())
}

/// Returns the `resourceType` of a contained entry, if present and non-empty.
pub fn contained_resource_type(entry: &Value) -> Option<&str> {
    entry
        .get("resourceType")
        .and_then(Value::as_str)
        .filter(|rt| !rt.is_empty())
}

/// Returns the normalized ids of all contained entries, in array order.
pub fn contained_ids(resource: &Value) -> Vec<&str> {
    contained_entries(resource)
        .iter()
        .filter_map(contained_id)
        .collect()
}

/// Returns the position of the entry whose normalized id equals `id`.
///
/// `id` may be given with or without the `#` prefix.
pub fn position_of(resource: &Value, id: &str) -> Option<usize> {
    let id = strip_internal_prefix(id);
    contained_entries(resource)
        .iter()
        .position(|entry| contained_id(entry) == Some(id))
}

/// Finds the contained entry with the given id.
///
/// `id` may be given with or without the `#` prefix.
pub fn find_by_id<'a>(resource: &'a Value, id: &str) -> Option<&'a Value> {
    position_of(resource, id).map(|index| &contained_entries(resource)[index])
}

/// Resolves a reference string against the parent's contained resources.
///
/// Returns `None` for references that are not internal (`Type/id`, URLs,
/// URNs) and for internal references with no matching entry.
///
/// # Example
///
/// ```
/// use nest_contained::resolve;
/// use serde_json::json;
///
/// let request = json!({
///     "resourceType": "MedicationRequest",
///     "contained": [{"resourceType": "Medication", "id": "med1"}],
///     "medicationReference": {"reference": "#med1"}
/// });
///
/// assert_eq!(resolve(&request, "#med1").unwrap()["id"], "med1");
/// assert!(resolve(&request, "#med2").is_none());
/// assert!(resolve(&request, "Medication/123").is_none());
/// ```
pub fn resolve<'a>(resource: &'a Value, reference: &str) -> Option<&'a Value> {
    match Reference::parse(reference) {
        Reference::Internal(id) => find_by_id(resource, id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parent() -> Value {
        json!({
            "resourceType": "MedicationRequest",
            "contained": [
                {"resourceType": "Medication", "id": "med1"},
                {"resourceType": "Practitioner", "id": "#pr1"},
                {"resourceType": "Organization"}
            ]
        })
    }

    #[test]
    fn test_contained_entries_absent_or_malformed() {
        assert!(contained_entries(&json!({"resourceType": "Patient"})).is_empty());
        assert!(contained_entries(&json!({"contained": {"id": "x"}})).is_empty());
        assert_eq!(contained_entries(&parent()).len(), 3);
    }

    #[test]
    fn test_contained_ids_are_normalized() {
        assert_eq!(contained_ids(&parent()), vec!["med1", "pr1"]);
    }

    #[test]
    fn test_resolve_internal() {
        let resource = parent();
        let found = resolve(&resource, "#med1").expect("med1 should resolve");
        assert_eq!(found["resourceType"], "Medication");
    }

    #[test]
    fn test_resolve_matches_prefixed_stored_id() {
        let resource = parent();
        let found = resolve(&resource, "#pr1").expect("pr1 should resolve");
        assert_eq!(found["resourceType"], "Practitioner");
    }

    #[test]
    fn test_resolve_absent() {
        assert!(resolve(&parent(), "#med2").is_none());
        assert!(resolve(&json!({"resourceType": "Patient"}), "#med1").is_none());
    }

    #[test]
    fn test_resolve_external_is_absent() {
        assert!(resolve(&parent(), "Medication/med1").is_none());
        assert!(resolve(&parent(), "med1").is_none());
    }

    #[test]
    fn test_position_of_accepts_either_form() {
        let resource = parent();
        assert_eq!(position_of(&resource, "pr1"), Some(1));
        assert_eq!(position_of(&resource, "#pr1"), Some(1));
        assert_eq!(position_of(&resource, "missing"), None);
    }
}
