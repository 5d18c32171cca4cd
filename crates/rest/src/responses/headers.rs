//! Response headers derived from a stored resource.

use axum::http::{HeaderMap, HeaderValue, header};
use nest_persistence::core::ResourceStorage;
use nest_persistence::types::StoredResource;

use crate::state::AppState;

/// FHIR JSON media type.
pub const FHIR_JSON: &str = "application/fhir+json";

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Content-Type, ETag, Last-Modified and optionally Location for a resource
/// (or a contained entry, which shares its parent's version).
#[derive(Debug)]
pub struct ResourceHeaders {
    map: HeaderMap,
}

impl ResourceHeaders {
    /// Builds headers for the current version of `stored`.
    ///
    /// The ETag is omitted when versioning is disabled.
    pub fn from_stored<S>(stored: &StoredResource, state: &AppState<S>) -> Self
    where
        S: ResourceStorage,
    {
        let mut map = HeaderMap::new();
        map.insert(header::CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON));

        if state.versioning_enabled() {
            insert_text(&mut map, header::ETAG, stored.etag());
        }

        let last_modified = stored.last_modified().format(HTTP_DATE).to_string();
        insert_text(&mut map, header::LAST_MODIFIED, &last_modified);

        Self { map }
    }

    /// Adds a Location header.
    pub fn with_location(mut self, location: impl AsRef<str>) -> Self {
        insert_text(&mut self.map, header::LOCATION, location.as_ref());
        self
    }

    /// Returns the headers for an Axum response.
    pub fn to_header_map(&self) -> HeaderMap {
        self.map.clone()
    }
}

// Values that are not valid header text are dropped rather than failing the response.
fn insert_text(map: &mut HeaderMap, name: header::HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        map.insert(name, value);
    }
}
