//! HTTP request handlers for FHIR interactions.
//!
//! This module contains handlers for the FHIR REST API interactions:
//!
//! - [`read`] - Read a resource by ID
//! - [`create`] - Create a new resource
//! - [`update`] - Update an existing resource
//! - [`delete`] - Delete a resource
//! - [`contained`] - List, read, add, replace and remove contained resources
//! - [`health`] - Health check endpoints

pub mod contained;
pub mod create;
pub mod delete;
pub mod health;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use contained::{
    contained_add_handler, contained_list_handler, contained_read_handler,
    contained_remove_handler, contained_replace_handler,
};
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use read::read_handler;
pub use update::update_handler;

use nest_persistence::core::ResourceStorage;
use nest_persistence::error::StorageError;
use nest_persistence::types::StoredResource;
use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Reads the current version of a resource that must exist.
///
/// Deleted resources surface as `Gone`, or as `NotFound` when the server is
/// configured not to reveal deletions.
pub(crate) async fn load_current<S>(
    state: &AppState<S>,
    resource_type: &str,
    id: &str,
) -> RestResult<StoredResource>
where
    S: ResourceStorage,
{
    match state.storage().read(resource_type, id).await {
        Ok(Some(stored)) => Ok(stored),
        Ok(None) => Err(RestError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }),
        Err(err) => Err(storage_error(state, err)),
    }
}

/// Converts a storage error, hiding deletions unless `return_gone` is set.
pub(crate) fn storage_error<S>(state: &AppState<S>, err: StorageError) -> RestError
where
    S: ResourceStorage,
{
    match RestError::from(err) {
        RestError::Gone { resource_type, id } if !state.return_gone() => {
            RestError::NotFound { resource_type, id }
        }
        other => other,
    }
}

/// Checks that a request body names the resource type of its URL.
pub(crate) fn check_resource_type(resource: &Value, resource_type: &str) -> RestResult<()> {
    match resource.get("resourceType").and_then(|v| v.as_str()) {
        Some(body_type) if body_type == resource_type => Ok(()),
        Some(body_type) => Err(RestError::BadRequest {
            message: format!(
                "Resource type in body ({}) does not match URL ({})",
                body_type, resource_type
            ),
        }),
        None => Err(RestError::BadRequest {
            message: "Resource must contain resourceType".to_string(),
        }),
    }
}
