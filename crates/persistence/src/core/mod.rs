//! Core storage traits and abstractions.
//!
//! [`ResourceStorage`] is the seam between the HTTP layer and a backend.
//! Backends live in [`crate::backends`].

mod storage;

pub use storage::ResourceStorage;
