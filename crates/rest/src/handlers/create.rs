//! Create interaction handler.
//!
//! Implements the FHIR [create interaction](https://hl7.org/fhir/http.html#create):
//! `POST [base]/[type]`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use nest_persistence::core::ResourceStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::FhirResource;
use crate::handlers::check_resource_type;
use crate::middleware::prefer::PreferHeader;
use crate::responses::build_write_response;
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;

/// Handler for the create interaction.
///
/// Creates a new resource. Contained ids are normalized and the contained
/// resources validated before anything is stored; the server assigns the
/// resource ID when the body has none.
///
/// # HTTP Request
///
/// `POST [base]/[type]`
///
/// # Headers
///
/// - `Content-Type` - Must be application/fhir+json or application/json
/// - `Prefer` - Response preference (return=minimal, return=representation, return=OperationOutcome)
///
/// # Response
///
/// - `201 Created` - Resource created successfully
/// - `400 Bad Request` - Invalid resource or invalid contained resources
/// - `409 Conflict` - A resource with the body's id already exists
///
/// # Example
///
/// ```http
/// POST /MedicationRequest HTTP/1.1
/// Host: fhir.example.com
/// Content-Type: application/fhir+json
///
/// {"resourceType": "MedicationRequest",
///  "contained": [{"resourceType": "Medication", "id": "med1"}],
///  "medicationReference": {"reference": "#med1"}}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    prefer: PreferHeader,
    FhirResource(resource): FhirResource,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        prefer = ?prefer.return_preference(),
        "Processing create request"
    );

    // Validate resourceType in body matches URL
    check_resource_type(&resource, &resource_type)?;

    let resource = nest_contained::admit(resource)?;

    let stored = state.storage().create(&resource_type, resource).await?;

    let location = format!("{}/{}/{}", state.base_url(), resource_type, stored.id());
    let headers = ResourceHeaders::from_stored(&stored, &state).with_location(&location);

    debug!(
        resource_type = %resource_type,
        id = %stored.id(),
        "Resource created"
    );

    Ok(build_write_response(
        StatusCode::CREATED,
        headers.to_header_map(),
        &prefer,
        stored.content(),
        &format!("Resource created: {}", location),
    ))
}
