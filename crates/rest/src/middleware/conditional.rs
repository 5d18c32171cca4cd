//! Conditional request header handling.
//!
//! Handles HTTP conditional headers for FHIR requests:
//! - If-Match: Optimistic locking for updates and contained edits
//! - If-None-Match: Conditional read

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use nest_persistence::types::StoredResource;

use crate::error::RestError;

/// Extracted conditional headers from a request.
#[derive(Debug, Default)]
pub struct ConditionalHeaders {
    /// If-Match header value (for optimistic locking).
    if_match: Option<String>,

    /// If-None-Match header value (for conditional read).
    if_none_match: Option<String>,
}

impl ConditionalHeaders {
    /// Creates a new ConditionalHeaders from a HeaderMap.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let if_match = headers
            .get(header::IF_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let if_none_match = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            if_match,
            if_none_match,
        }
    }

    /// Returns the If-Match header value.
    ///
    /// Used for optimistic locking - the write should only proceed if
    /// the current resource version matches this ETag.
    pub fn if_match(&self) -> Option<&str> {
        self.if_match.as_deref()
    }

    /// Returns the If-None-Match header value.
    ///
    /// Used for conditional read - return 304 Not Modified if the
    /// current resource version matches this ETag.
    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }

    /// Checks the If-Match precondition against the current version.
    ///
    /// Passes when no If-Match was sent, when it is `*`, or when it names the
    /// current version.
    pub fn check_if_match(&self, current: &StoredResource) -> Result<(), RestError> {
        match self.if_match() {
            None | Some("*") => Ok(()),
            Some(etag) if current.matches_etag(etag) => Ok(()),
            Some(etag) => Err(RestError::PreconditionFailed {
                message: format!("ETag mismatch: expected {}, got {}", etag, current.etag()),
            }),
        }
    }

    /// Returns `true` if If-None-Match names the current version.
    pub fn not_modified(&self, current: &StoredResource) -> bool {
        self.if_none_match()
            .is_some_and(|etag| etag == "*" || current.matches_etag(etag))
    }
}

/// Axum extractor for conditional headers.
impl<S> FromRequestParts<S> for ConditionalHeaders
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ConditionalHeaders::from_headers(&parts.headers))
    }
}
