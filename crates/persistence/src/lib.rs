//! Nest FHIR Server Persistence Layer
//!
//! This crate stores FHIR resources as JSON documents together with the
//! metadata the REST layer needs: version ids, ETags and timestamps.
//!
//! # Architecture
//!
//! - [`types`] - [`StoredResource`](types::StoredResource) and its `meta`
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`ResourceStorage`](core::ResourceStorage) trait
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use nest_persistence::types::StoredResource;
//! use serde_json::json;
//!
//! let resource = StoredResource::new(
//!     "Observation",
//!     "obs-1",
//!     json!({
//!         "resourceType": "Observation",
//!         "contained": [{"resourceType": "Patient", "id": "p1"}],
//!         "subject": {"reference": "#p1"}
//!     }),
//! );
//!
//! assert_eq!(resource.version_id(), "1");
//! assert_eq!(resource.url(), "Observation/obs-1");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
