//! Delete interaction handler.
//!
//! Implements the FHIR [delete interaction](https://hl7.org/fhir/http.html#delete):
//! `DELETE [base]/[type]/[id]`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nest_persistence::core::ResourceStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::handlers::storage_error;
use crate::state::AppState;

/// Handler for the delete interaction.
///
/// Deletes a resource (soft delete). Its contained resources go with it.
///
/// # HTTP Request
///
/// `DELETE [base]/[type]/[id]`
///
/// # Response
///
/// - `204 No Content` - Resource deleted successfully
/// - `404 Not Found` - Resource does not exist
/// - `410 Gone` - Resource was already deleted
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        "Processing delete request"
    );

    state
        .storage()
        .delete(&resource_type, &id)
        .await
        .map_err(|err| storage_error(&state, err))?;

    debug!(
        resource_type = %resource_type,
        id = %id,
        "Resource deleted"
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}
