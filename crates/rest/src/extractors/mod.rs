//! Axum extractors for FHIR-specific data.
//!
//! - [`FhirResource`] - Extract a JSON resource body, checking its Content-Type

mod fhir_resource;

pub use fhir_resource::{FhirResource, FhirResourceRejection};
