//! In-memory backend integration tests.
//!
//! These tests drive the backend only through the `ResourceStorage` trait.

use serde_json::json;

use nest_persistence::backends::InMemoryBackend;
use nest_persistence::core::ResourceStorage;
use nest_persistence::error::{ConcurrencyError, ResourceError, StorageError};

fn medication_request(id: &str) -> serde_json::Value {
    json!({
        "resourceType": "MedicationRequest",
        "id": id,
        "status": "active",
        "contained": [{"resourceType": "Medication", "id": "med1"}],
        "medicationReference": {"reference": "#med1"}
    })
}

// ============================================================================
// Create Tests
// ============================================================================

#[tokio::test]
async fn test_create_resource() {
    let backend = InMemoryBackend::new();

    let created = backend
        .create("MedicationRequest", medication_request("rx1"))
        .await
        .unwrap();

    assert_eq!(created.resource_type(), "MedicationRequest");
    assert_eq!(created.id(), "rx1");
    assert_eq!(created.version_id(), "1");
    assert_eq!(created.content()["meta"]["versionId"], "1");
    assert_eq!(created.content()["contained"][0]["id"], "med1");
}

#[tokio::test]
async fn test_create_duplicate_fails() {
    let backend = InMemoryBackend::new();

    backend
        .create("MedicationRequest", medication_request("dup"))
        .await
        .unwrap();

    let result = backend
        .create("MedicationRequest", medication_request("dup"))
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::AlreadyExists { .. }))
    ));
}

#[tokio::test]
async fn test_same_id_different_types() {
    let backend = InMemoryBackend::new();

    backend
        .create("Observation", json!({"id": "shared"}))
        .await
        .unwrap();
    backend
        .create("Condition", json!({"id": "shared"}))
        .await
        .unwrap();

    assert_eq!(backend.count(None).await.unwrap(), 2);
    assert_eq!(backend.count(Some("Observation")).await.unwrap(), 1);
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_returns_stored_content() {
    let backend = InMemoryBackend::new();
    let created = backend
        .create("MedicationRequest", medication_request("rx1"))
        .await
        .unwrap();

    let read = backend
        .read("MedicationRequest", "rx1")
        .await
        .unwrap()
        .expect("resource should exist");

    assert_eq!(read.content(), created.content());
    assert_eq!(read.etag(), "W/\"1\"");
}

#[tokio::test]
async fn test_read_missing_is_none() {
    let backend = InMemoryBackend::new();
    assert!(backend.read("Observation", "nope").await.unwrap().is_none());
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
async fn test_update_increments_version() {
    let backend = InMemoryBackend::new();
    let created = backend
        .create("MedicationRequest", medication_request("rx1"))
        .await
        .unwrap();

    let mut content = created.content().clone();
    content["status"] = json!("completed");

    let updated = backend.update(&created, content).await.unwrap();
    assert_eq!(updated.version_id(), "2");
    assert_eq!(updated.content()["status"], "completed");
    assert_eq!(updated.content()["meta"]["versionId"], "2");
}

#[tokio::test]
async fn test_update_with_stale_version_conflicts() {
    let backend = InMemoryBackend::new();
    let v1 = backend
        .create("MedicationRequest", medication_request("rx1"))
        .await
        .unwrap();

    backend
        .update(&v1, medication_request("rx1"))
        .await
        .unwrap();

    let result = backend.update(&v1, medication_request("rx1")).await;
    match result {
        Err(StorageError::Concurrency(ConcurrencyError::VersionConflict {
            expected_version,
            actual_version,
            ..
        })) => {
            assert_eq!(expected_version, "1");
            assert_eq!(actual_version, "2");
        }
        other => panic!("expected version conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_or_update() {
    let backend = InMemoryBackend::new();

    let (first, created) = backend
        .create_or_update("Observation", "o1", json!({"status": "preliminary"}))
        .await
        .unwrap();
    assert!(created);
    assert_eq!(first.content()["id"], "o1");

    let (second, created) = backend
        .create_or_update("Observation", "o1", json!({"status": "final"}))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second.version_id(), "2");
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_then_read_is_gone() {
    let backend = InMemoryBackend::new();
    let created = backend
        .create("MedicationRequest", medication_request("rx1"))
        .await
        .unwrap();

    backend.delete("MedicationRequest", "rx1").await.unwrap();

    let result = backend.read("MedicationRequest", "rx1").await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::Gone { .. }))
    ));

    let result = backend.update(&created, medication_request("rx1")).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::NotFound { .. }))
    ));
    assert_eq!(backend.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let backend = InMemoryBackend::new();
    let result = backend.delete("Observation", "nope").await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::NotFound { .. }))
    ));
}
