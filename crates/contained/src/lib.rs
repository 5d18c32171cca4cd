//! # nest-contained
//!
//! Management of FHIR contained resources: resources embedded in a parent's
//! `contained` array and addressed from inside that parent through internal
//! references of the form `#<id>`.
//!
//! The crate works on plain [`serde_json::Value`] documents and is storage
//! agnostic. It provides:
//!
//! - [`scan_references`] - locate every `reference` string in a document
//! - [`validate`] / [`validate_issues`] - structural checks on contained entries
//! - [`normalize`] - strip a stray `#` from contained ids
//! - [`resolve`] - look up the entry an internal reference points at
//! - [`add`], [`replace`], [`remove`] - edit the `contained` array
//! - [`extract`], [`get_by_type`] - flatten entries for indexing
//! - [`admit`] - the normalize-then-validate check applied to every write
//!
//! ## Quick start
//!
//! ```
//! use nest_contained::{admit, resolve};
//! use serde_json::json;
//!
//! let request = admit(json!({
//!     "resourceType": "MedicationRequest",
//!     "contained": [{"resourceType": "Medication", "id": "#med1"}],
//!     "medicationReference": {"reference": "#med1"}
//! }))
//! .expect("valid contained resources");
//!
//! let medication = resolve(&request, "#med1").unwrap();
//! assert_eq!(medication["resourceType"], "Medication");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod gate;
pub mod mutator;
pub mod normalize;
pub mod reference;
pub mod resolver;
pub mod scanner;
pub mod validator;

pub use error::{ContainedError, ContainedResult};
pub use extract::{CONTAINED_IN_FIELD, extract, get_by_type};
pub use gate::{RejectedWrite, admit};
pub use mutator::{add, remove, replace};
pub use normalize::{is_normalized, normalize, normalize_in_place};
pub use reference::{
    CONTAINED_FIELD, INTERNAL_PREFIX, Reference, internal_reference, strip_internal_prefix,
};
pub use resolver::{contained_entries, contained_ids, find_by_id, resolve};
pub use scanner::{ScannedReference, internal_references, parent_references, scan_references};
pub use validator::{ContainedIssue, IssueKind, is_valid, validate, validate_issues};
