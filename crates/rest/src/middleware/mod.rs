//! HTTP middleware for the FHIR REST API.
//!
//! This module contains Axum request-header extractors:
//!
//! - [`conditional`] - Conditional request headers (If-Match, If-None-Match)
//! - [`prefer`] - Prefer header handling

pub mod conditional;
pub mod prefer;

pub use conditional::ConditionalHeaders;
pub use prefer::{PreferHeader, ReturnPreference};
