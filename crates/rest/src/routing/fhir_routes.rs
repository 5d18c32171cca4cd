//! FHIR route configuration.
//!
//! Defines all routes for the FHIR RESTful API.

use axum::{
    Router,
    routing::{get, post},
};
use nest_persistence::core::ResourceStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all FHIR REST API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Type-level
/// - `POST /{type}` - Create
///
/// ## Instance-level
/// - `GET /{type}/{id}` - Read
/// - `PUT /{type}/{id}` - Update
/// - `DELETE /{type}/{id}` - Delete
///
/// ## Contained
/// - `GET /{type}/{id}/contained` - List contained resources
/// - `POST /{type}/{id}/contained` - Add a contained resource
/// - `GET /{type}/{id}/contained/{cid}` - Read a contained resource
/// - `PUT /{type}/{id}/contained/{cid}` - Replace a contained resource
/// - `DELETE /{type}/{id}/contained/{cid}` - Remove a contained resource
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ResourceStorage + Send + Sync + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // Type-level routes
        .route("/{resource_type}", post(handlers::create_handler::<S>))
        // Instance-level routes
        .route(
            "/{resource_type}/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        )
        // Contained routes
        .route(
            "/{resource_type}/{id}/contained",
            get(handlers::contained_list_handler::<S>).post(handlers::contained_add_handler::<S>),
        )
        .route(
            "/{resource_type}/{id}/contained/{contained_id}",
            get(handlers::contained_read_handler::<S>)
                .put(handlers::contained_replace_handler::<S>)
                .delete(handlers::contained_remove_handler::<S>),
        )
        // State
        .with_state(state)
}
