//! Stored resource types.
//!
//! This module defines the [`StoredResource`] type, which wraps a FHIR
//! resource with persistence metadata such as version and timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A FHIR resource with persistence metadata.
///
/// `StoredResource` wraps a FHIR resource (stored as JSON) along with
/// metadata required for persistence operations:
///
/// - **Identity**: Resource type and ID
/// - **Versioning**: Version ID for optimistic locking
/// - **Timestamps**: Creation, modification, and deletion times
/// - **ETag**: For HTTP caching and conditional updates
///
/// Every new version writes its `id`, `meta.versionId` and `meta.lastUpdated`
/// into the content, so the JSON handed back to clients always agrees with
/// the metadata.
///
/// # Examples
///
/// ```
/// use nest_persistence::types::StoredResource;
/// use serde_json::json;
///
/// let resource = StoredResource::new(
///     "MedicationRequest",
///     "rx1",
///     json!({
///         "resourceType": "MedicationRequest",
///         "contained": [{"resourceType": "Medication", "id": "med1"}]
///     }),
/// );
///
/// assert_eq!(resource.url(), "MedicationRequest/rx1");
/// assert_eq!(resource.version_id(), "1");
/// assert_eq!(resource.content()["id"], "rx1");
/// assert_eq!(resource.content()["meta"]["versionId"], "1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResource {
    /// The FHIR resource type (e.g., "Observation").
    resource_type: String,

    /// The resource's logical ID.
    id: String,

    /// The version ID (monotonically increasing).
    version_id: String,

    /// The resource content as JSON.
    content: Value,

    /// When the resource was first created.
    created_at: DateTime<Utc>,

    /// When the resource was last modified.
    last_modified: DateTime<Utc>,

    /// If the resource has been deleted, when it was deleted.
    deleted_at: Option<DateTime<Utc>>,

    /// ETag for HTTP caching (derived from version_id).
    etag: String,

    /// HTTP method that created this version.
    method: Option<ResourceMethod>,
}

/// HTTP method that created a resource version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceMethod {
    /// Resource was created via POST.
    Post,
    /// Resource was created/updated via PUT.
    Put,
    /// Resource was deleted via DELETE.
    Delete,
}

fn weak_etag(version_id: &str) -> String {
    format!("W/\"{}\"", version_id)
}

impl StoredResource {
    /// Creates a new stored resource at version "1".
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>, content: Value) -> Self {
        let now = Utc::now();
        let version_id = "1".to_string();
        let etag = weak_etag(&version_id);

        let mut stored = Self {
            resource_type: resource_type.into(),
            id: id.into(),
            version_id,
            content,
            created_at: now,
            last_modified: now,
            deleted_at: None,
            etag,
            method: Some(ResourceMethod::Post),
        };
        stored.stamp_content();
        stored
    }

    /// Returns the FHIR resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the resource's logical ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the version ID.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// Returns the resource content as JSON.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consumes self and returns the content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// Returns when the resource was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the resource was last modified.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns when the resource was deleted, if applicable.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` if the resource has been deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the ETag for HTTP caching.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Returns the HTTP method that created this version.
    pub fn method(&self) -> Option<ResourceMethod> {
        self.method
    }

    /// Returns the relative URL of this resource (e.g., "Observation/123").
    pub fn url(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }

    /// Returns the versioned URL path (e.g., "Observation/123/_history/1").
    pub fn versioned_url(&self) -> String {
        format!("{}/{}/_history/{}", self.resource_type, self.id, self.version_id)
    }

    /// Creates a new version of this resource with updated content.
    ///
    /// The new version has an incremented version ID, a fresh
    /// `last_modified` timestamp and a new ETag. A deleted resource comes
    /// back to life.
    pub fn new_version(self, content: Value, method: ResourceMethod) -> Self {
        let version_id = next_version(&self.version_id);
        let etag = weak_etag(&version_id);

        let mut stored = Self {
            resource_type: self.resource_type,
            id: self.id,
            version_id,
            content,
            created_at: self.created_at,
            last_modified: Utc::now(),
            deleted_at: None,
            etag,
            method: Some(method),
        };
        stored.stamp_content();
        stored
    }

    /// Marks this resource as deleted.
    ///
    /// Creates a new version with the deleted_at timestamp set. The content
    /// of the last live version is kept.
    pub fn mark_deleted(self) -> Self {
        let version_id = next_version(&self.version_id);
        let etag = weak_etag(&version_id);
        let now = Utc::now();

        Self {
            resource_type: self.resource_type,
            id: self.id,
            version_id,
            content: self.content,
            created_at: self.created_at,
            last_modified: now,
            deleted_at: Some(now),
            etag,
            method: Some(ResourceMethod::Delete),
        }
    }

    /// Checks if the given ETag matches this resource's ETag.
    ///
    /// Used for If-Match and If-None-Match conditionals.
    pub fn matches_etag(&self, etag: &str) -> bool {
        // Strip W/ prefix and quotes for comparison
        let normalized_self = self.etag.trim_start_matches("W/").trim_matches('"');
        let normalized_other = etag.trim().trim_start_matches("W/").trim_matches('"');
        normalized_self == normalized_other
    }

    /// Returns the FHIR Meta element for this resource.
    pub fn meta(&self) -> ResourceMeta {
        ResourceMeta {
            version_id: self.version_id.clone(),
            last_updated: self.last_modified,
        }
    }

    /// Writes `resourceType`, `id` and `meta` into the content.
    ///
    /// Other `meta` fields (profile, tag, ...) are preserved. Content that is
    /// not a JSON object is left alone.
    fn stamp_content(&mut self) {
        let last_updated = self
            .last_modified
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let Some(obj) = self.content.as_object_mut() else {
            return;
        };

        obj.insert(
            "resourceType".to_string(),
            Value::String(self.resource_type.clone()),
        );
        obj.insert("id".to_string(), Value::String(self.id.clone()));

        let meta = obj
            .entry("meta")
            .or_insert_with(|| Value::Object(Map::new()));
        if !meta.is_object() {
            *meta = Value::Object(Map::new());
        }
        if let Some(meta) = meta.as_object_mut() {
            meta.insert(
                "versionId".to_string(),
                Value::String(self.version_id.clone()),
            );
            meta.insert("lastUpdated".to_string(), Value::String(last_updated));
        }
    }
}

fn next_version(version_id: &str) -> String {
    let version: u64 = version_id.parse().unwrap_or(0);
    (version + 1).to_string()
}

/// FHIR Meta element extracted from a stored resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceMeta {
    /// The version ID.
    #[serde(rename = "versionId")]
    pub version_id: String,

    /// The last update timestamp.
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_stored_resource() {
        let resource = StoredResource::new(
            "Observation",
            "123",
            json!({"resourceType": "Observation", "status": "final"}),
        );

        assert_eq!(resource.resource_type(), "Observation");
        assert_eq!(resource.id(), "123");
        assert_eq!(resource.version_id(), "1");
        assert_eq!(resource.method(), Some(ResourceMethod::Post));
        assert!(!resource.is_deleted());
    }

    #[test]
    fn test_content_is_stamped() {
        let resource = StoredResource::new(
            "Observation",
            "o1",
            json!({"meta": {"profile": ["http://example.org/p"]}, "status": "final"}),
        );

        let content = resource.content();
        assert_eq!(content["resourceType"], "Observation");
        assert_eq!(content["id"], "o1");
        assert_eq!(content["meta"]["versionId"], "1");
        assert_eq!(content["meta"]["profile"][0], "http://example.org/p");
        assert!(content["meta"]["lastUpdated"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_url_generation() {
        let resource = StoredResource::new("Condition", "123", json!({}));

        assert_eq!(resource.url(), "Condition/123");
        assert_eq!(resource.versioned_url(), "Condition/123/_history/1");
    }

    #[test]
    fn test_new_version() {
        let resource = StoredResource::new("Observation", "123", json!({"status": "preliminary"}));

        let updated = resource.new_version(json!({"status": "final"}), ResourceMethod::Put);

        assert_eq!(updated.version_id(), "2");
        assert_eq!(updated.etag(), "W/\"2\"");
        assert_eq!(updated.content()["status"], "final");
        assert_eq!(updated.content()["meta"]["versionId"], "2");
        assert_eq!(updated.method(), Some(ResourceMethod::Put));
    }

    #[test]
    fn test_mark_deleted() {
        let resource = StoredResource::new("Observation", "123", json!({}));

        let deleted = resource.mark_deleted();

        assert!(deleted.is_deleted());
        assert!(deleted.deleted_at().is_some());
        assert_eq!(deleted.version_id(), "2");
        assert_eq!(deleted.method(), Some(ResourceMethod::Delete));
    }

    #[test]
    fn test_etag_matching() {
        let resource = StoredResource::new("Observation", "123", json!({}));

        assert!(resource.matches_etag("W/\"1\""));
        assert!(resource.matches_etag("\"1\""));
        assert!(resource.matches_etag("1"));
        assert!(!resource.matches_etag("2"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let resource = StoredResource::new("Observation", "123", json!({"status": "final"}));

        let json = serde_json::to_string(&resource).unwrap();
        let parsed: StoredResource = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id(), resource.id());
        assert_eq!(parsed.version_id(), resource.version_id());
        assert_eq!(parsed.content(), resource.content());
    }
}
