//! # nest-rest - FHIR RESTful API with contained resource management
//!
//! This crate exposes the contained resource subsystem over HTTP. Every
//! create and update passes through contained id normalization and
//! validation before it reaches storage, and contained resources can be
//! listed, read, added, replaced and removed through their parent.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nest_rest::{create_app_with_config, ServerConfig};
//! use nest_persistence::backends::InMemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(InMemoryBackend::new(), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | create | POST | `/[type]` |
//! | read | GET | `/[type]/[id]` |
//! | update | PUT | `/[type]/[id]` |
//! | delete | DELETE | `/[type]/[id]` |
//! | contained list | GET | `/[type]/[id]/contained[?type=X]` |
//! | contained add | POST | `/[type]/[id]/contained[?_autoId=true]` |
//! | contained read | GET | `/[type]/[id]/contained/[cid]` |
//! | contained replace | PUT | `/[type]/[id]/contained/[cid]` |
//! | contained remove | DELETE | `/[type]/[id]/contained/[cid]` |
//! | health | GET | `/health` |
//!
//! ## HTTP Headers
//!
//! - `Content-Type` - Request body format (JSON only)
//! - `ETag` / `If-Match` - Optimistic locking for updates and contained edits
//! - `If-None-Match` - Conditional read
//! - `Prefer` - Response preference (return=minimal, return=representation, return=OperationOutcome)
//!
//! ## Error Handling
//!
//! All errors are returned as FHIR [OperationOutcome](https://hl7.org/fhir/operationoutcome.html)
//! resources with appropriate HTTP status codes:
//!
//! | HTTP Status | FHIR Issue Code | Description |
//! |-------------|-----------------|-------------|
//! | 400 | invalid / required / duplicate / not-found | Bad request, rejected contained resources |
//! | 404 | not-found | Resource or contained resource not found |
//! | 409 | conflict / duplicate | Version conflict, duplicate or still referenced contained id |
//! | 410 | deleted | Resource was deleted |
//! | 412 | conflict | Precondition failed |
//! | 415 | not-supported | Unsupported media type |
//! | 500 | exception | Internal server error |
//!
//! ## Configuration
//!
//! See [`ServerConfig`] for the `NEST_*` environment variables.

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use nest_persistence::core::ResourceStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: ResourceStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```
/// use nest_persistence::backends::InMemoryBackend;
/// use nest_rest::{ServerConfig, create_app_with_config};
///
/// let config = ServerConfig {
///     enable_cors: false,
///     ..ServerConfig::for_testing()
/// };
/// let _app = create_app_with_config(InMemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: ResourceStorage + Send + Sync + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), config.clone());

    // Build the router with all FHIR routes
    let router = routing::fhir_routes::create_routes(state)
        .layer(DefaultBodyLimit::max(config.max_body_size));

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when
/// set, takes precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nest_rest={level},nest_contained={level},nest_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
