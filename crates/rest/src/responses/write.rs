//! Responses for successful writes.

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::middleware::prefer::{PreferHeader, ReturnPreference};
use crate::responses::operation_outcome::information_outcome;

/// Builds the response for a successful write.
///
/// The body follows `Prefer: return=`: nothing for `minimal`, an
/// informational OperationOutcome carrying `message` for `OperationOutcome`,
/// and `representation` otherwise.
pub fn build_write_response(
    status: StatusCode,
    header_map: HeaderMap,
    prefer: &PreferHeader,
    representation: &Value,
    message: &str,
) -> Response {
    match prefer.effective() {
        ReturnPreference::Minimal => (status, header_map).into_response(),
        ReturnPreference::OperationOutcome => {
            (status, header_map, Json(information_outcome(message))).into_response()
        }
        ReturnPreference::Representation => {
            (status, header_map, Json(representation.clone())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn prefer(value: &'static str) -> PreferHeader {
        let mut headers = HeaderMap::new();
        headers.insert("prefer", HeaderValue::from_static(value));
        PreferHeader::from_headers(&headers)
    }

    #[test]
    fn test_minimal_has_no_body() {
        let response = build_write_response(
            StatusCode::CREATED,
            HeaderMap::new(),
            &prefer("return=minimal"),
            &serde_json::json!({"resourceType": "MedicationRequest"}),
            "created",
        );
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get("content-type").is_none());
    }

    #[test]
    fn test_representation_is_default() {
        let response = build_write_response(
            StatusCode::OK,
            HeaderMap::new(),
            &PreferHeader::default(),
            &serde_json::json!({"resourceType": "MedicationRequest"}),
            "updated",
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
