//! Contained id normalization.
//!
//! The `#` prefix belongs to the reference string, not to the identifier.
//! Clients sometimes send `"id": "#med1"` for a contained entry; this module
//! rewrites such ids to `"med1"` so stored documents are canonical.

use serde_json::Value;

use crate::reference::{CONTAINED_FIELD, INTERNAL_PREFIX, strip_internal_prefix};

/// Returns the resource with every `contained[i].id` stripped of leading `#`s.
///
/// Entries without a string `id` are left untouched. Applying this twice is
/// the same as applying it once.
///
/// # Example
///
/// ```
/// use nest_contained::normalize;
/// use serde_json::json;
///
/// let normalized = normalize(json!({
///     "resourceType": "MedicationRequest",
///     "contained": [{"resourceType": "Medication", "id": "#med1"}]
/// }));
/// assert_eq!(normalized["contained"][0]["id"], "med1");
/// ```
pub fn normalize(mut resource: Value) -> Value {
    normalize_in_place(&mut resource);
    resource
}

/// Strips the `#` prefix from contained ids of a resource the caller owns.
///
/// Returns the number of ids that were rewritten.
pub fn normalize_in_place(resource: &mut Value) -> usize {
    let Some(entries) = resource
        .get_mut(CONTAINED_FIELD)
        .and_then(Value::as_array_mut)
    else {
        return 0;
    };

    let mut rewritten = 0;
    for entry in entries.iter_mut() {
        if let Some(Value::String(id)) = entry.get_mut("id") {
            if id.starts_with(INTERNAL_PREFIX) {
                *id = strip_internal_prefix(id).to_string();
                rewritten += 1;
            }
        }
    }

    if rewritten > 0 {
        tracing::trace!(rewritten, "normalized contained ids");
    }

    rewritten
}

/// Returns `true` if no contained id carries the `#` prefix.
pub fn is_normalized(resource: &Value) -> bool {
    crate::resolver::contained_entries(resource).iter().all(|entry| {
        !entry
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| id.starts_with(INTERNAL_PREFIX))
    })
}
