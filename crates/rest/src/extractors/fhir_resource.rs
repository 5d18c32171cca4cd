//! FHIR resource extractor.
//!
//! Extracts JSON resources from request bodies.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for FHIR resources.
///
/// Extracts a JSON object from the request body. Bodies sent with a
/// non-JSON Content-Type are refused with 415; a missing Content-Type is
/// treated as JSON. Whether `resourceType` fits the route is checked by the
/// handler, since contained entries and top-level resources differ there.
///
/// # Example
///
/// ```rust,ignore
/// use nest_rest::extractors::FhirResource;
///
/// async fn create_handler(FhirResource(resource): FhirResource) {
///     println!("Resource type: {}", resource["resourceType"]);
/// }
/// ```
#[derive(Debug)]
pub struct FhirResource(pub Value);

impl FhirResource {
    /// Returns the resource type.
    pub fn resource_type(&self) -> Option<&str> {
        self.0.get("resourceType").and_then(|v| v.as_str())
    }

    /// Returns the resource ID if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    /// Consumes the extractor and returns the inner Value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Error type for FHIR resource extraction failures.
#[derive(Debug)]
pub enum FhirResourceRejection {
    /// The body could not be read or is not valid JSON.
    InvalidJson(String),
    /// The body is JSON but not an object.
    NotAnObject,
    /// Unsupported content type.
    UnsupportedMediaType(String),
}

impl From<FhirResourceRejection> for RestError {
    fn from(rejection: FhirResourceRejection) -> Self {
        match rejection {
            FhirResourceRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
            FhirResourceRejection::NotAnObject => RestError::BadRequest {
                message: "Request body must be a JSON object".to_string(),
            },
            FhirResourceRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
        }
    }
}

impl IntoResponse for FhirResourceRejection {
    fn into_response(self) -> Response {
        RestError::from(self).into_response()
    }
}

fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence == "application/fhir+json" || essence.ends_with("+json")
}

impl<S> FromRequest<S> for FhirResource
where
    S: Send + Sync,
{
    type Rejection = FhirResourceRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Check content type (must own the string before moving req)
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        if !is_json_media_type(&content_type) {
            return Err(FhirResourceRejection::UnsupportedMediaType(content_type));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))?;

        if !value.is_object() {
            return Err(FhirResourceRejection::NotAnObject);
        }

        Ok(FhirResource(value))
    }
}
