//! In-memory storage backend.
//!
//! Keeps the current version of every resource in a map guarded by a
//! [`parking_lot::RwLock`]. Nothing survives a restart. Suitable for tests,
//! demos and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::core::ResourceStorage;
use crate::error::{ConcurrencyError, ResourceError, StorageError, StorageResult, ValidationError};
use crate::types::{ResourceMethod, StoredResource};

type ResourceKey = (String, String);

fn key(resource_type: &str, id: &str) -> ResourceKey {
    (resource_type.to_string(), id.to_string())
}

fn not_found(resource_type: &str, id: &str) -> StorageError {
    StorageError::Resource(ResourceError::NotFound {
        resource_type: resource_type.to_string(),
        id: id.to_string(),
    })
}

fn gone(stored: &StoredResource) -> StorageError {
    StorageError::Resource(ResourceError::Gone {
        resource_type: stored.resource_type().to_string(),
        id: stored.id().to_string(),
        deleted_at: stored.deleted_at(),
    })
}

fn ensure_object(resource_type: &str, resource: &Value) -> StorageResult<()> {
    if resource.is_object() {
        Ok(())
    } else {
        Err(StorageError::Validation(ValidationError::InvalidResource {
            message: format!("{} content must be a JSON object", resource_type),
        }))
    }
}

/// Storage backend holding resources in process memory.
///
/// # Example
///
/// ```
/// use nest_persistence::backends::memory::InMemoryBackend;
/// use nest_persistence::core::ResourceStorage;
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let backend = InMemoryBackend::new();
/// let stored = backend
///     .create("Observation", json!({"resourceType": "Observation", "status": "final"}))
///     .await
///     .unwrap();
/// assert_eq!(stored.version_id(), "1");
/// assert_eq!(backend.count(Some("Observation")).await.unwrap(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    resources: RwLock<HashMap<ResourceKey, StoredResource>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStorage for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, resource_type: &str, resource: Value) -> StorageResult<StoredResource> {
        ensure_object(resource_type, &resource)?;

        // Extract or generate ID
        let id = resource
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut resources = self.resources.write();
        let k = key(resource_type, &id);
        if resources.contains_key(&k) {
            return Err(StorageError::Resource(ResourceError::AlreadyExists {
                resource_type: resource_type.to_string(),
                id,
            }));
        }

        let stored = StoredResource::new(resource_type, &id, resource);
        resources.insert(k, stored.clone());

        debug!(resource_type = %resource_type, id = %id, "Stored new resource");
        Ok(stored)
    }

    async fn create_or_update(
        &self,
        resource_type: &str,
        id: &str,
        resource: Value,
    ) -> StorageResult<(StoredResource, bool)> {
        ensure_object(resource_type, &resource)?;

        let mut resources = self.resources.write();
        let k = key(resource_type, id);

        let (stored, created) = match resources.remove(&k) {
            Some(existing) => {
                let created = existing.is_deleted();
                (existing.new_version(resource, ResourceMethod::Put), created)
            }
            None => (StoredResource::new(resource_type, id, resource), true),
        };
        resources.insert(k, stored.clone());

        debug!(
            resource_type = %resource_type,
            id = %id,
            version = %stored.version_id(),
            created,
            "Stored resource via PUT"
        );
        Ok((stored, created))
    }

    async fn read(&self, resource_type: &str, id: &str) -> StorageResult<Option<StoredResource>> {
        let resources = self.resources.read();
        match resources.get(&key(resource_type, id)) {
            Some(stored) if stored.is_deleted() => Err(gone(stored)),
            Some(stored) => Ok(Some(stored.clone())),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        current: &StoredResource,
        resource: Value,
    ) -> StorageResult<StoredResource> {
        let resource_type = current.resource_type();
        let id = current.id();
        ensure_object(resource_type, &resource)?;

        let mut resources = self.resources.write();
        let k = key(resource_type, id);

        let actual_version = match resources.get(&k) {
            Some(stored) if !stored.is_deleted() => stored.version_id().to_string(),
            _ => return Err(not_found(resource_type, id)),
        };

        if actual_version != current.version_id() {
            return Err(StorageError::Concurrency(
                ConcurrencyError::VersionConflict {
                    resource_type: resource_type.to_string(),
                    id: id.to_string(),
                    expected_version: current.version_id().to_string(),
                    actual_version,
                },
            ));
        }

        let Some(existing) = resources.remove(&k) else {
            return Err(not_found(resource_type, id));
        };
        let stored = existing.new_version(resource, ResourceMethod::Put);
        resources.insert(k, stored.clone());

        debug!(
            resource_type = %resource_type,
            id = %id,
            version = %stored.version_id(),
            "Updated resource"
        );
        Ok(stored)
    }

    async fn delete(&self, resource_type: &str, id: &str) -> StorageResult<()> {
        let mut resources = self.resources.write();
        let k = key(resource_type, id);

        let existing = match resources.remove(&k) {
            Some(existing) if existing.is_deleted() => {
                let err = gone(&existing);
                resources.insert(k, existing);
                return Err(err);
            }
            Some(existing) => existing,
            None => return Err(not_found(resource_type, id)),
        };

        let deleted = existing.mark_deleted();
        debug!(
            resource_type = %resource_type,
            id = %id,
            version = %deleted.version_id(),
            "Soft-deleted resource"
        );
        resources.insert(k, deleted);
        Ok(())
    }

    async fn count(&self, resource_type: Option<&str>) -> StorageResult<u64> {
        let resources = self.resources.read();
        let count = resources
            .values()
            .filter(|stored| !stored.is_deleted())
            .filter(|stored| resource_type.is_none_or(|rt| stored.resource_type() == rt))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_uuid() {
        let backend = InMemoryBackend::new();
        let stored = backend
            .create("Observation", json!({"resourceType": "Observation"}))
            .await
            .unwrap();

        assert!(uuid::Uuid::parse_str(stored.id()).is_ok());
        assert_eq!(stored.content()["id"], stored.id());
    }

    #[tokio::test]
    async fn test_create_rejects_non_object() {
        let backend = InMemoryBackend::new();
        let err = backend.create("Observation", json!([1, 2])).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::InvalidResource { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_twice_is_gone() {
        let backend = InMemoryBackend::new();
        backend
            .create("Observation", json!({"id": "o1"}))
            .await
            .unwrap();

        backend.delete("Observation", "o1").await.unwrap();
        let err = backend.delete("Observation", "o1").await.unwrap_err();
        assert!(matches!(err, StorageError::Resource(ResourceError::Gone { .. })));
        assert!(!backend.exists("Observation", "o1").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_recreates_deleted_resource() {
        let backend = InMemoryBackend::new();
        backend
            .create("Observation", json!({"id": "o1"}))
            .await
            .unwrap();
        backend.delete("Observation", "o1").await.unwrap();

        let (stored, created) = backend
            .create_or_update("Observation", "o1", json!({"status": "final"}))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(stored.version_id(), "3");
    }
}
