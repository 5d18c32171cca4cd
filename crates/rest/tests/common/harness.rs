//! REST API test harness.
//!
//! Serves the real router over an in-memory backend.

use std::sync::Arc;

use axum::http::HeaderName;
use axum_test::{TestRequest, TestResponse, TestServer};
use nest_persistence::backends::InMemoryBackend;
use nest_persistence::core::ResourceStorage;
use nest_persistence::types::StoredResource;
use serde_json::Value;

use nest_rest::{AppState, ServerConfig};

pub const IF_MATCH: HeaderName = HeaderName::from_static("if-match");
pub const IF_NONE_MATCH: HeaderName = HeaderName::from_static("if-none-match");
pub const PREFER: HeaderName = HeaderName::from_static("prefer");

/// Base URL every harness is configured with.
pub const BASE_URL: &str = "http://localhost:8080";

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_read() {
///     let harness = RestTestHarness::new();
///     harness.seed(fixtures::medication_request("rx1")).await;
///
///     let response = harness.get("/MedicationRequest/rx1").await;
///     response.assert_status_ok();
/// }
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend, shared with the server.
    pub backend: Arc<InMemoryBackend>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    ///
    /// The base URL is always [`BASE_URL`].
    pub fn with_config(config: ServerConfig) -> Self {
        let config = ServerConfig {
            base_url: BASE_URL.to_string(),
            ..config
        };
        let backend = Arc::new(InMemoryBackend::new());

        let state = AppState::new(Arc::clone(&backend), config.clone());
        let app = nest_rest::routing::fhir_routes::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            config,
        }
    }

    /// Stores a resource directly, bypassing the HTTP layer.
    pub async fn seed(&self, resource: Value) -> StoredResource {
        let resource_type = resource["resourceType"]
            .as_str()
            .expect("fixture has resourceType")
            .to_string();
        self.backend
            .create(&resource_type, resource)
            .await
            .expect("Failed to seed resource")
    }

    /// Reads the current stored content, bypassing the HTTP layer.
    pub async fn stored(&self, resource_type: &str, id: &str) -> Option<Value> {
        self.backend
            .read(resource_type, id)
            .await
            .ok()
            .flatten()
            .map(StoredResource::into_content)
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }

    /// Makes a POST request with a FHIR JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        fhir_json(self.server.post(path), &body).await
    }

    /// Makes a PUT request with a FHIR JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        fhir_json(self.server.put(path), &body).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.server.delete(path).await
    }

    /// Starts a POST request with a FHIR JSON body, for adding headers.
    pub fn post_request(&self, path: &str, body: &Value) -> TestRequest {
        fhir_json(self.server.post(path), body)
    }

    /// Starts a PUT request with a FHIR JSON body, for adding headers.
    pub fn put_request(&self, path: &str, body: &Value) -> TestRequest {
        fhir_json(self.server.put(path), body)
    }
}

fn fhir_json(request: TestRequest, body: &Value) -> TestRequest {
    request.json(body).content_type("application/fhir+json")
}
