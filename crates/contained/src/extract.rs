//! Flattening of contained resources for indexing and search.

use serde_json::{Value, json};

use crate::resolver::{contained_entries, contained_resource_type};

/// Field added to extracted entries pointing back at their parent.
pub const CONTAINED_IN_FIELD: &str = "_containedIn";

/// Returns a copy of every contained entry annotated with its parent.
///
/// Each copy gets a `_containedIn` field holding the parent's
/// `resourceType` and `id` (JSON `null` when the parent has none yet).
/// Entries that are not JSON objects are skipped.
///
/// # Example
///
/// ```
/// use nest_contained::extract;
/// use serde_json::json;
///
/// let request = json!({
///     "resourceType": "MedicationRequest",
///     "id": "rx1",
///     "contained": [{"resourceType": "Medication", "id": "med1"}]
/// });
///
/// let flat = extract(&request);
/// assert_eq!(flat[0]["_containedIn"]["resourceType"], "MedicationRequest");
/// assert_eq!(flat[0]["_containedIn"]["id"], "rx1");
/// ```
pub fn extract(resource: &Value) -> Vec<Value> {
    let provenance = json!({
        "resourceType": resource.get("resourceType").cloned().unwrap_or(Value::Null),
        "id": resource.get("id").cloned().unwrap_or(Value::Null),
    });

    contained_entries(resource)
        .iter()
        .filter_map(|entry| {
            let mut copy = entry.as_object()?.clone();
            copy.insert(CONTAINED_IN_FIELD.to_string(), provenance.clone());
            Some(Value::Object(copy))
        })
        .collect()
}

/// Returns the contained entries with the given `resourceType`, in array order.
pub fn get_by_type<'a>(resource: &'a Value, resource_type: &str) -> Vec<&'a Value> {
    contained_entries(resource)
        .iter()
        .filter(|entry| contained_resource_type(entry) == Some(resource_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition() -> Value {
        json!({
            "resourceType": "Condition",
            "id": "c1",
            "contained": [
                {"resourceType": "Observation", "id": "o1"},
                {"resourceType": "Practitioner", "id": "pr1"},
                {"resourceType": "Observation", "id": "o2"}
            ]
        })
    }

    #[test]
    fn test_extract_preserves_order_and_annotates() {
        let flat = extract(&condition());
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0]["id"], "o1");
        assert_eq!(flat[2]["id"], "o2");
        for entry in &flat {
            assert_eq!(
                entry[CONTAINED_IN_FIELD],
                json!({"resourceType": "Condition", "id": "c1"})
            );
        }
    }

    #[test]
    fn test_extract_does_not_touch_parent() {
        let parent = condition();
        let _ = extract(&parent);
        assert!(parent["contained"][0].get(CONTAINED_IN_FIELD).is_none());
    }

    #[test]
    fn test_extract_without_contained() {
        assert!(extract(&json!({"resourceType": "Patient", "id": "p"})).is_empty());
    }

    #[test]
    fn test_extract_parent_without_id() {
        let flat = extract(&json!({
            "resourceType": "Observation",
            "contained": [{"resourceType": "Patient", "id": "p1"}]
        }));
        assert_eq!(flat[0][CONTAINED_IN_FIELD]["id"], Value::Null);
    }

    #[test]
    fn test_get_by_type() {
        let parent = condition();
        let observations = get_by_type(&parent, "Observation");
        let ids: Vec<_> = observations.iter().map(|o| o["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["o1", "o2"]);
        assert!(observations[0].get(CONTAINED_IN_FIELD).is_none());
        assert!(get_by_type(&parent, "Patient").is_empty());
    }
}
