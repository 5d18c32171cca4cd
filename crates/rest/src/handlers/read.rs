//! Read interaction handler.
//!
//! Implements the FHIR [read interaction](https://hl7.org/fhir/http.html#read):
//! `GET [base]/[type]/[id]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nest_persistence::core::ResourceStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::handlers::load_current;
use crate::middleware::conditional::ConditionalHeaders;
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;

/// Handler for the read interaction.
///
/// Reads a resource by type and ID, returning the stored content verbatim.
///
/// # HTTP Request
///
/// `GET [base]/[type]/[id]`
///
/// # Headers
///
/// - `If-None-Match` - Return 304 Not Modified if ETag matches
///
/// # Response
///
/// - `200 OK` - Resource found, returns the resource
/// - `304 Not Modified` - Resource unchanged (conditional read)
/// - `404 Not Found` - Resource does not exist
/// - `410 Gone` - Resource was deleted
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    conditional: ConditionalHeaders,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        "Processing read request"
    );

    let stored = load_current(&state, &resource_type, &id).await?;

    // Check conditional headers (If-None-Match)
    if conditional.not_modified(&stored) {
        debug!(etag = %stored.etag(), "Returning 304 Not Modified");
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let headers = ResourceHeaders::from_stored(&stored, &state);

    debug!(
        resource_type = %resource_type,
        id = %id,
        version = %stored.version_id(),
        "Returning resource"
    );

    Ok((
        StatusCode::OK,
        headers.to_header_map(),
        Json(stored.into_content()),
    )
        .into_response())
}
