//! Storage backend implementations.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | Process-local map, no durability |

pub mod memory;

pub use memory::InMemoryBackend;
