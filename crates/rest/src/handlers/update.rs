//! Update interaction handler.
//!
//! Implements the FHIR [update interaction](https://hl7.org/fhir/http.html#update):
//! `PUT [base]/[type]/[id]`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use nest_persistence::core::ResourceStorage;
use nest_persistence::error::{ResourceError, StorageError};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::FhirResource;
use crate::handlers::check_resource_type;
use crate::middleware::conditional::ConditionalHeaders;
use crate::middleware::prefer::PreferHeader;
use crate::responses::build_write_response;
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;

/// Handler for the update interaction.
///
/// Updates an existing resource, or creates it if it doesn't exist (upsert).
/// The body passes the same contained normalization and validation as a
/// create.
///
/// # HTTP Request
///
/// `PUT [base]/[type]/[id]`
///
/// # Headers
///
/// - `Content-Type` - Must be application/fhir+json or application/json
/// - `If-Match` - Optimistic locking (ETag of current version)
/// - `Prefer` - Response preference
///
/// # Response
///
/// - `200 OK` - Resource updated successfully
/// - `201 Created` - Resource created (upsert)
/// - `400 Bad Request` - Invalid resource or invalid contained resources
/// - `409 Conflict` - Version conflict (concurrent modification)
/// - `412 Precondition Failed` - If-Match condition not met
///
/// # Example
///
/// ```http
/// PUT /MedicationRequest/rx1 HTTP/1.1
/// Host: fhir.example.com
/// Content-Type: application/fhir+json
/// If-Match: W/"1"
///
/// {"resourceType": "MedicationRequest", "id": "rx1", "status": "active"}
/// ```
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    conditional: ConditionalHeaders,
    prefer: PreferHeader,
    FhirResource(resource): FhirResource,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        if_match = ?conditional.if_match(),
        "Processing update request"
    );

    // Validate resourceType in body matches URL
    check_resource_type(&resource, &resource_type)?;

    // Validate ID in body matches URL (if present)
    if let Some(body_id) = resource.get("id").and_then(|v| v.as_str()) {
        if body_id != id {
            return Err(RestError::BadRequest {
                message: format!(
                    "Resource ID in body ({}) does not match URL ({})",
                    body_id, id
                ),
            });
        }
    }

    // Check if If-Match is required
    if state.require_if_match() && conditional.if_match().is_none() {
        return Err(RestError::PreconditionFailed {
            message: "If-Match header is required for updates".to_string(),
        });
    }

    let resource = nest_contained::admit(resource)?;

    // A deleted resource is recreated, like one that never existed
    let existing = match state.storage().read(&resource_type, &id).await {
        Ok(found) => found,
        Err(StorageError::Resource(ResourceError::Gone { .. })) => None,
        Err(err) => return Err(err.into()),
    };

    let (stored, created) = match existing {
        Some(current) => {
            conditional.check_if_match(&current)?;
            (state.storage().update(&current, resource).await?, false)
        }
        None => {
            // If-Match with no existing resource is a precondition failure
            // (unless If-Match: * which means "any version")
            if conditional.if_match().is_some_and(|etag| etag != "*") {
                return Err(RestError::PreconditionFailed {
                    message: "Resource does not exist".to_string(),
                });
            }
            state
                .storage()
                .create_or_update(&resource_type, &id, resource)
                .await?
        }
    };

    let mut headers = ResourceHeaders::from_stored(&stored, &state);
    let status = if created {
        headers = headers.with_location(format!(
            "{}/{}/{}",
            state.base_url(),
            resource_type,
            stored.id()
        ));
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    debug!(
        resource_type = %resource_type,
        id = %id,
        version = %stored.version_id(),
        created = created,
        "Resource updated"
    );

    let action = if created { "created" } else { "updated" };
    Ok(build_write_response(
        status,
        headers.to_header_map(),
        &prefer,
        stored.content(),
        &format!("Resource {}: {}", action, stored.url()),
    ))
}
