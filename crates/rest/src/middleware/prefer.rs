//! Prefer header handling.
//!
//! Handles the HTTP Prefer header for controlling response behavior.
//! See: https://hl7.org/fhir/http.html#ops

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};

/// What a successful write should return in its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnPreference {
    /// Headers only.
    Minimal,
    /// The written resource.
    #[default]
    Representation,
    /// An informational OperationOutcome.
    OperationOutcome,
}

impl ReturnPreference {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "minimal" => Some(ReturnPreference::Minimal),
            "representation" => Some(ReturnPreference::Representation),
            "OperationOutcome" => Some(ReturnPreference::OperationOutcome),
            _ => None,
        }
    }
}

/// Extracted Prefer header values from a request.
#[derive(Debug, Default)]
pub struct PreferHeader {
    /// Return preference, if the client stated a recognized one.
    return_preference: Option<ReturnPreference>,
}

impl PreferHeader {
    /// Creates a new PreferHeader from a HeaderMap.
    ///
    /// Unknown directives and unknown `return=` values are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let prefer = headers
            .get("prefer")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let mut result = Self::default();

        // Parse Prefer header directives
        for directive in prefer.split(',') {
            let directive = directive.trim();

            if let Some(value) = directive.strip_prefix("return=") {
                result.return_preference = ReturnPreference::parse(value.trim_matches('"'));
            }
        }

        result
    }

    /// Returns the stated return preference, if any.
    pub fn return_preference(&self) -> Option<ReturnPreference> {
        self.return_preference
    }

    /// Returns the preference to act on, defaulting to `representation`.
    pub fn effective(&self) -> ReturnPreference {
        self.return_preference.unwrap_or_default()
    }

    /// Checks if minimal return is requested.
    pub fn is_minimal(&self) -> bool {
        self.return_preference == Some(ReturnPreference::Minimal)
    }
}

/// Axum extractor for Prefer header.
impl<S> FromRequestParts<S> for PreferHeader
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PreferHeader::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_return_minimal() {
        let mut headers = HeaderMap::new();
        headers.insert("prefer", HeaderValue::from_static("return=minimal"));

        let prefer = PreferHeader::from_headers(&headers);
        assert_eq!(prefer.return_preference(), Some(ReturnPreference::Minimal));
        assert!(prefer.is_minimal());
    }

    #[test]
    fn test_return_operation_outcome() {
        let mut headers = HeaderMap::new();
        headers.insert("prefer", HeaderValue::from_static("return=OperationOutcome"));

        let prefer = PreferHeader::from_headers(&headers);
        assert_eq!(prefer.effective(), ReturnPreference::OperationOutcome);
    }

    #[test]
    fn test_multiple_directives() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "prefer",
            HeaderValue::from_static("handling=lenient, return=minimal"),
        );

        let prefer = PreferHeader::from_headers(&headers);
        assert!(prefer.is_minimal());
    }

    #[test]
    fn test_unknown_value_falls_back_to_representation() {
        let mut headers = HeaderMap::new();
        headers.insert("prefer", HeaderValue::from_static("return=everything"));

        let prefer = PreferHeader::from_headers(&headers);
        assert!(prefer.return_preference().is_none());
        assert_eq!(prefer.effective(), ReturnPreference::Representation);
    }

    #[test]
    fn test_empty() {
        let prefer = PreferHeader::from_headers(&HeaderMap::new());
        assert!(prefer.return_preference().is_none());
        assert!(!prefer.is_minimal());
    }
}
