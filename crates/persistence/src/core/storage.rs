//! Core resource storage trait.
//!
//! This module defines the [`ResourceStorage`] trait, which provides the
//! fundamental CRUD operations for FHIR resources.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ResourceError, StorageError, StorageResult};
use crate::types::StoredResource;

/// Core storage trait for FHIR resources.
///
/// # Versioning
///
/// All mutating operations (create, update, delete) create new versions of
/// resources. The version ID is monotonically increasing and is used for
/// optimistic locking via the `If-Match` HTTP header.
///
/// # Soft Deletes
///
/// `delete` marks the resource as deleted but keeps it. Later reads fail with
/// `ResourceError::Gone`.
///
/// # Content
///
/// Backends store the JSON they are given. Checking that contained resources
/// are well formed happens before a write reaches the backend.
///
/// # Example
///
/// ```ignore
/// use nest_persistence::core::ResourceStorage;
///
/// async fn example<S: ResourceStorage>(storage: &S) -> StorageResult<()> {
///     let request = serde_json::json!({
///         "resourceType": "MedicationRequest",
///         "contained": [{"resourceType": "Medication", "id": "med1"}],
///         "medicationReference": {"reference": "#med1"}
///     });
///     let stored = storage.create("MedicationRequest", request).await?;
///
///     let read = storage.read("MedicationRequest", stored.id()).await?;
///     assert!(read.is_some());
///
///     let mut content = stored.content().clone();
///     content["status"] = serde_json::json!("active");
///     let updated = storage.update(&stored, content).await?;
///     assert_eq!(updated.version_id(), "2");
///
///     storage.delete("MedicationRequest", stored.id()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ResourceStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Creates a new resource.
    ///
    /// The resource keeps the `id` it carries; otherwise the backend assigns
    /// one.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If the content is not a JSON object
    /// * `StorageError::Resource(AlreadyExists)` - If a resource with the same ID exists
    async fn create(&self, resource_type: &str, resource: Value) -> StorageResult<StoredResource>;

    /// Creates a resource with a specific ID (PUT semantics).
    ///
    /// If the resource doesn't exist, or was deleted, it is (re)created.
    /// Otherwise this is an unconditional update.
    ///
    /// Returns the stored resource and whether it was created.
    async fn create_or_update(
        &self,
        resource_type: &str,
        id: &str,
        resource: Value,
    ) -> StorageResult<(StoredResource, bool)>;

    /// Reads a resource by type and ID.
    ///
    /// Returns `None` if no such resource was ever stored.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(Gone)` - If the resource was deleted
    async fn read(&self, resource_type: &str, id: &str) -> StorageResult<Option<StoredResource>>;

    /// Updates an existing resource.
    ///
    /// `current` is the version the caller based its change on.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the resource doesn't exist or was deleted
    /// * `StorageError::Concurrency(VersionConflict)` - If the resource was modified since `current`
    async fn update(
        &self,
        current: &StoredResource,
        resource: Value,
    ) -> StorageResult<StoredResource>;

    /// Deletes a resource (soft delete).
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the resource doesn't exist
    /// * `StorageError::Resource(Gone)` - If already deleted
    async fn delete(&self, resource_type: &str, id: &str) -> StorageResult<()>;

    /// Checks if a live resource exists.
    async fn exists(&self, resource_type: &str, id: &str) -> StorageResult<bool> {
        match self.read(resource_type, id).await {
            Ok(found) => Ok(found.is_some()),
            Err(StorageError::Resource(ResourceError::Gone { .. })) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Counts non-deleted resources, optionally restricted to one type.
    async fn count(&self, resource_type: Option<&str>) -> StorageResult<u64>;
}
