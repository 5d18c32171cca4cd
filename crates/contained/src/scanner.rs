//! Reference scanning.
//!
//! Walks a JSON document and collects every string stored under a key named
//! `reference`, together with the location it was found at. Locations use
//! dotted field names with bracketed array indices, for example
//! `evidence[0].detail[0].reference`.
//!
//! One subtree is skipped by name. When scanning a parent resource that is
//! `contained`: the fields of a contained resource are not references made
//! by the parent.

use serde_json::Value;

use crate::reference::{CONTAINED_FIELD, REFERENCE_FIELD, Reference};

/// A reference string found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedReference {
    /// Location of the `reference` field.
    pub path: String,
    /// The reference string as written.
    pub value: String,
}

impl ScannedReference {
    /// Classifies the reference value.
    pub fn classify(&self) -> Reference<'_> {
        Reference::parse(&self.value)
    }

    /// Returns the contained id if this is an internal reference.
    pub fn internal_id(&self) -> Option<&str> {
        self.classify().internal_id()
    }
}

/// Collects every `reference` string in `value`, skipping any field named `exclude`.
///
/// Both internal and external references are returned; filtering is up to
/// the caller. Non-string values under a `reference` key are ignored.
///
/// # Example
///
/// ```
/// use nest_contained::scan_references;
/// use serde_json::json;
///
/// let resource = json!({
///     "resourceType": "MedicationRequest",
///     "medicationReference": {"reference": "#med1"},
///     "contained": [{"resourceType": "Medication", "id": "med1",
///                    "manufacturer": {"reference": "Organization/1"}}]
/// });
///
/// let found = scan_references(&resource, "contained");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].path, "medicationReference.reference");
/// assert_eq!(found[0].value, "#med1");
/// ```
pub fn scan_references(value: &Value, exclude: &str) -> Vec<ScannedReference> {
    let mut found = Vec::new();
    let mut path = String::new();
    walk(value, exclude, &mut path, &mut found);
    found
}

/// Collects the references a parent resource makes, ignoring its `contained` array.
pub fn parent_references(resource: &Value) -> Vec<ScannedReference> {
    scan_references(resource, CONTAINED_FIELD)
}

/// Collects the internal references a parent resource makes.
pub fn internal_references(resource: &Value) -> Vec<ScannedReference> {
    parent_references(resource)
        .into_iter()
        .filter(|r| r.classify().is_internal())
        .collect()
}

fn walk(value: &Value, exclude: &str, path: &mut String, found: &mut Vec<ScannedReference>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == exclude {
                    continue;
                }

                let mark = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);

                if key == REFERENCE_FIELD {
                    if let Value::String(s) = child {
                        found.push(ScannedReference {
                            path: path.clone(),
                            value: s.clone(),
                        });
                    }
                } else {
                    walk(child, exclude, path, found);
                }

                path.truncate(mark);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let mark = path.len();
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
                walk(child, exclude, path, found);
                path.truncate(mark);
            }
        }
        _ => {}
    }
}
