//! Core types for the persistence layer.
//!
//! - [`StoredResource`] - A FHIR resource with persistence metadata
//! - [`ResourceMeta`] - The FHIR `meta` element derived from that metadata

mod stored_resource;

pub use stored_resource::{ResourceMeta, ResourceMethod, StoredResource};
