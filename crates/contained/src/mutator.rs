//! Editing of a parent's `contained` array.
//!
//! [`add`], [`replace`] and [`remove`] never modify their input. Each returns
//! a new parent document, or an error and no document at all, so a failed
//! edit can never leave a half-updated resource behind.

use serde_json::Value;
use tracing::debug;

use crate::error::{ContainedError, ContainedResult};
use crate::reference::{CONTAINED_FIELD, strip_internal_prefix};
use crate::resolver::{contained_entries, contained_ids, position_of};
use crate::scanner::internal_references;

/// Prefix used for generated ids when the new entry has no `resourceType`.
const FALLBACK_ID_PREFIX: &str = "contained";

/// Appends a resource to the parent's `contained` array.
///
/// The entry keeps its own `id` (with any `#` stripped) when it has one.
/// Otherwise, if `auto_id` is set, an id of the form
/// `<lowercased resourceType>-<n>` is generated, starting at
/// `n = contained.len() + 1` and counting up until the id is free.
///
/// Returns the new parent and the id the entry was stored under.
///
/// # Errors
///
/// * [`ContainedError::MissingId`] - no id and `auto_id` is false
/// * [`ContainedError::DuplicateId`] - the id is already taken
/// * [`ContainedError::NotAnObject`] - parent or entry is not a JSON object
///
/// # Example
///
/// ```
/// use nest_contained::add;
/// use serde_json::json;
///
/// let parent = json!({"resourceType": "MedicationRequest"});
/// let (updated, id) = add(&parent, json!({"resourceType": "Medication"}), true).unwrap();
///
/// assert_eq!(id, "medication-1");
/// assert_eq!(updated["contained"][0]["id"], "medication-1");
/// assert!(parent.get("contained").is_none());
/// ```
pub fn add(
    resource: &Value,
    new_contained: Value,
    auto_id: bool,
) -> ContainedResult<(Value, String)> {
    ensure_object(resource, "parent resource")?;
    let Value::Object(mut entry) = new_contained else {
        return Err(ContainedError::NotAnObject {
            what: "contained resource",
        });
    };

    let existing = contained_ids(resource);

    let explicit = entry
        .get("id")
        .and_then(Value::as_str)
        .map(strip_internal_prefix)
        .filter(|id| !id.is_empty())
        .map(String::from);

    let id = match explicit {
        Some(id) => id,
        None if auto_id => {
            let resource_type = entry
                .get("resourceType")
                .and_then(Value::as_str)
                .filter(|rt| !rt.is_empty());
            generate_id(resource_type, &existing)
        }
        None => return Err(ContainedError::MissingId),
    };

    if existing.contains(&id.as_str()) {
        debug!(id = %id, "refusing to add duplicate contained id");
        return Err(ContainedError::DuplicateId { id });
    }

    entry.insert("id".to_string(), Value::String(id.clone()));

    let mut entries = contained_entries(resource).to_vec();
    entries.push(Value::Object(entry));
    let updated = with_contained(resource, entries);

    debug!(id = %id, "added contained resource");
    Ok((updated, id))
}

/// Replaces the content of an existing contained entry.
///
/// The entry keeps its position and its id: whatever `id` the new content
/// carries is overwritten with `target_id` (stripped of any `#`).
///
/// # Errors
///
/// * [`ContainedError::NotFound`] - no entry has `target_id`
/// * [`ContainedError::NotAnObject`] - the new content is not a JSON object
pub fn replace(resource: &Value, target_id: &str, new_contained: Value) -> ContainedResult<Value> {
    let target = strip_internal_prefix(target_id);
    let index = position_of(resource, target).ok_or_else(|| ContainedError::NotFound {
        id: target.to_string(),
    })?;

    let Value::Object(mut entry) = new_contained else {
        return Err(ContainedError::NotAnObject {
            what: "contained resource",
        });
    };
    entry.insert("id".to_string(), Value::String(target.to_string()));

    let mut entries = contained_entries(resource).to_vec();
    entries[index] = Value::Object(entry);
    let updated = with_contained(resource, entries);

    debug!(id = %target, index, "replaced contained resource");
    Ok(updated)
}

/// Removes a contained entry.
///
/// Removal is refused while any internal reference in the parent still
/// targets the entry. When the last entry is removed the `contained` field
/// is dropped.
///
/// # Errors
///
/// * [`ContainedError::NotFound`] - no entry has `target_id`
/// * [`ContainedError::StillReferenced`] - the parent still points at it
pub fn remove(resource: &Value, target_id: &str) -> ContainedResult<Value> {
    let target = strip_internal_prefix(target_id);
    let index = position_of(resource, target).ok_or_else(|| ContainedError::NotFound {
        id: target.to_string(),
    })?;

    let paths: Vec<String> = internal_references(resource)
        .into_iter()
        .filter(|found| found.internal_id() == Some(target))
        .map(|found| found.path)
        .collect();

    if !paths.is_empty() {
        debug!(id = %target, references = paths.len(), "refusing to remove referenced contained resource");
        return Err(ContainedError::StillReferenced {
            id: target.to_string(),
            paths,
        });
    }

    let mut entries = contained_entries(resource).to_vec();
    entries.remove(index);
    let updated = with_contained(resource, entries);

    debug!(id = %target, "removed contained resource");
    Ok(updated)
}

/// Picks the first free `<prefix>-<n>` id, starting after the current entry count.
fn generate_id(resource_type: Option<&str>, existing: &[&str]) -> String {
    let prefix = resource_type
        .map(str::to_lowercase)
        .unwrap_or_else(|| FALLBACK_ID_PREFIX.to_string());

    let mut n = existing.len() + 1;
    loop {
        let candidate = format!("{}-{}", prefix, n);
        if !existing.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

fn ensure_object(resource: &Value, what: &'static str) -> ContainedResult<()> {
    if resource.is_object() {
        Ok(())
    } else {
        Err(ContainedError::NotAnObject { what })
    }
}

/// Copies the parent with its `contained` array set to `entries`.
///
/// An empty list drops the field. Other fields keep their order.
fn with_contained(resource: &Value, entries: Vec<Value>) -> Value {
    let mut updated = resource.clone();
    if let Some(obj) = updated.as_object_mut() {
        if entries.is_empty() {
            obj.retain(|key, _| key != CONTAINED_FIELD);
        } else {
            obj.insert(CONTAINED_FIELD.to_string(), Value::Array(entries));
        }
    }
    updated
}
