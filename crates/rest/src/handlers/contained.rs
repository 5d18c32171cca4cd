//! Contained resource interaction handlers.
//!
//! Contained resources have no identity outside their parent, so every
//! interaction here addresses them through the parent:
//!
//! - `GET [base]/[type]/[id]/contained` - list, optionally `?type=X`
//! - `GET [base]/[type]/[id]/contained/[cid]` - read one
//! - `POST [base]/[type]/[id]/contained` - add, optionally `?_autoId=true`
//! - `PUT [base]/[type]/[id]/contained/[cid]` - replace
//! - `DELETE [base]/[type]/[id]/contained/[cid]` - remove
//!
//! Edits rewrite the parent. The edited parent passes contained validation
//! again and is stored against the version read at the start of the
//! request, so a concurrent change surfaces as 409.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use nest_contained::internal_reference;
use nest_contained::resolver::contained_id;
use nest_persistence::core::ResourceStorage;
use nest_persistence::types::StoredResource;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::FhirResource;
use crate::handlers::load_current;
use crate::middleware::conditional::ConditionalHeaders;
use crate::middleware::prefer::PreferHeader;
use crate::responses::bundle::{BundleBuilder, BundleEntry};
use crate::responses::build_write_response;
use crate::responses::headers::{FHIR_JSON, ResourceHeaders};
use crate::state::AppState;

/// Query parameters of the contained listing.
#[derive(Debug, Default, Deserialize)]
pub struct ContainedListQuery {
    /// Only list contained resources of this type.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

/// Query parameters of the contained add.
#[derive(Debug, Default, Deserialize)]
pub struct ContainedAddQuery {
    /// Assign an id when the new entry has none. Defaults to the server setting.
    #[serde(rename = "_autoId")]
    pub auto_id: Option<bool>,
}

/// Handler listing a parent's contained resources as a collection Bundle.
///
/// Without `type`, each entry is annotated with `_containedIn` naming the
/// parent. With `type`, only entries of that type are listed, unannotated.
///
/// # Response
///
/// - `200 OK` - Bundle of type `collection`, possibly empty
/// - `404 Not Found` / `410 Gone` - No such parent
pub async fn contained_list_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    Query(query): Query<ContainedListQuery>,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        filter = ?query.resource_type,
        "Processing contained list request"
    );

    let parent = load_current(&state, &resource_type, &id).await?;

    let (entries, self_link) = match &query.resource_type {
        Some(wanted) => (
            nest_contained::get_by_type(parent.content(), wanted)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>(),
            format!("{}?type={}", contained_url(&state, &parent), wanted),
        ),
        None => (
            nest_contained::extract(parent.content()),
            contained_url(&state, &parent),
        ),
    };

    let parent_url = format!("{}/{}", state.base_url(), parent.url());
    let total = entries.len();
    let bundle = entries
        .into_iter()
        .fold(
            BundleBuilder::collection().total(total).self_link(self_link),
            |bundle, entry| {
                let full_url = format!("{}#{}", parent_url, contained_id(&entry).unwrap_or_default());
                bundle.add_entry(BundleEntry::with_resource(entry, full_url))
            },
        )
        .timestamp(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .build();

    debug!(
        resource_type = %resource_type,
        id = %id,
        listed = total,
        "Returning contained listing"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, FHIR_JSON)],
        Json(bundle),
    )
        .into_response())
}

/// Handler reading one contained resource.
///
/// # Response
///
/// - `200 OK` - The contained resource as stored in the parent
/// - `404 Not Found` - No such parent, or no entry with this id
pub async fn contained_read_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id, cid)): Path<(String, String, String)>,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        "Processing contained read request"
    );

    let parent = load_current(&state, &resource_type, &id).await?;

    let Some(entry) = nest_contained::resolve(parent.content(), &internal_reference(&cid)) else {
        return Err(RestError::ContainedNotFound {
            id: nest_contained::strip_internal_prefix(&cid).to_string(),
        });
    };

    let headers = ResourceHeaders::from_stored(&parent, &state);

    Ok((StatusCode::OK, headers.to_header_map(), Json(entry.clone())).into_response())
}

/// Handler adding a contained resource to a parent.
///
/// # Response
///
/// - `201 Created` - Location names the new entry; body is the updated parent
/// - `400 Bad Request` - No id and no automatic assignment, or the result is invalid
/// - `409 Conflict` - Duplicate contained id, or concurrent parent change
/// - `412 Precondition Failed` - If-Match condition not met
pub async fn contained_add_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    Query(query): Query<ContainedAddQuery>,
    conditional: ConditionalHeaders,
    prefer: PreferHeader,
    FhirResource(new_contained): FhirResource,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    let auto_id = query.auto_id.unwrap_or_else(|| state.auto_contained_id());

    debug!(
        resource_type = %resource_type,
        id = %id,
        auto_id = auto_id,
        "Processing contained add request"
    );

    let current = load_for_edit(&state, &resource_type, &id, &conditional).await?;

    let (updated, cid) = nest_contained::add(current.content(), new_contained, auto_id)?;
    let stored = commit(&state, &current, updated).await?;

    let location = format!("{}/{}", contained_url(&state, &stored), cid);
    let headers = ResourceHeaders::from_stored(&stored, &state).with_location(&location);

    info!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        version = %stored.version_id(),
        "Contained resource added"
    );

    Ok(build_write_response(
        StatusCode::CREATED,
        headers.to_header_map(),
        &prefer,
        stored.content(),
        &format!("Contained resource added: {}", location),
    ))
}

/// Handler replacing a contained resource in place.
///
/// # Response
///
/// - `200 OK` - Body is the updated parent
/// - `400 Bad Request` - The result is invalid
/// - `404 Not Found` - No such parent, or no entry with this id
/// - `409 Conflict` - Concurrent parent change
/// - `412 Precondition Failed` - If-Match condition not met
pub async fn contained_replace_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id, cid)): Path<(String, String, String)>,
    conditional: ConditionalHeaders,
    prefer: PreferHeader,
    FhirResource(new_contained): FhirResource,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        "Processing contained replace request"
    );

    let current = load_for_edit(&state, &resource_type, &id, &conditional).await?;

    let updated = nest_contained::replace(current.content(), &cid, new_contained)?;
    let stored = commit(&state, &current, updated).await?;

    info!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        version = %stored.version_id(),
        "Contained resource replaced"
    );

    let headers = ResourceHeaders::from_stored(&stored, &state);
    Ok(build_write_response(
        StatusCode::OK,
        headers.to_header_map(),
        &prefer,
        stored.content(),
        &format!("Contained resource replaced: {}#{}", stored.url(), cid),
    ))
}

/// Handler removing a contained resource.
///
/// An entry that something in the parent still references cannot be removed.
///
/// # Response
///
/// - `200 OK` - Body is the updated parent
/// - `404 Not Found` - No such parent, or no entry with this id
/// - `409 Conflict` - The entry is still referenced, or concurrent parent change
/// - `412 Precondition Failed` - If-Match condition not met
pub async fn contained_remove_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id, cid)): Path<(String, String, String)>,
    conditional: ConditionalHeaders,
    prefer: PreferHeader,
) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        "Processing contained remove request"
    );

    let current = load_for_edit(&state, &resource_type, &id, &conditional).await?;

    let updated = nest_contained::remove(current.content(), &cid)?;
    let stored = commit(&state, &current, updated).await?;

    info!(
        resource_type = %resource_type,
        id = %id,
        contained_id = %cid,
        version = %stored.version_id(),
        "Contained resource removed"
    );

    let headers = ResourceHeaders::from_stored(&stored, &state);
    Ok(build_write_response(
        StatusCode::OK,
        headers.to_header_map(),
        &prefer,
        stored.content(),
        &format!("Contained resource removed: {}#{}", stored.url(), cid),
    ))
}

/// Reads the parent about to be edited and checks If-Match against it.
async fn load_for_edit<S>(
    state: &AppState<S>,
    resource_type: &str,
    id: &str,
    conditional: &ConditionalHeaders,
) -> RestResult<StoredResource>
where
    S: ResourceStorage,
{
    if state.require_if_match() && conditional.if_match().is_none() {
        return Err(RestError::PreconditionFailed {
            message: "If-Match header is required for updates".to_string(),
        });
    }

    let current = load_current(state, resource_type, id).await?;
    conditional.check_if_match(&current)?;
    Ok(current)
}

/// Validates the edited parent and stores it over `current`.
async fn commit<S>(
    state: &AppState<S>,
    current: &StoredResource,
    updated: Value,
) -> RestResult<StoredResource>
where
    S: ResourceStorage,
{
    let admitted = nest_contained::admit(updated)?;
    Ok(state.storage().update(current, admitted).await?)
}

fn contained_url<S>(state: &AppState<S>, parent: &StoredResource) -> String
where
    S: ResourceStorage,
{
    format!("{}/{}/contained", state.base_url(), parent.url())
}
