//! Application state for the FHIR REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend and the server configuration.

use std::sync::Arc;

use nest_persistence::core::ResourceStorage;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`ResourceStorage`])
///
/// # Example
///
/// ```
/// use nest_persistence::backends::InMemoryBackend;
/// use nest_rest::{AppState, ServerConfig};
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(InMemoryBackend::new()), ServerConfig::default());
/// assert_eq!(state.base_url(), "http://localhost:8080");
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: ResourceStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns whether versioning is enabled.
    pub fn versioning_enabled(&self) -> bool {
        self.config.enable_versioning
    }

    /// Returns whether If-Match is required for updates.
    pub fn require_if_match(&self) -> bool {
        self.config.require_if_match
    }

    /// Returns whether deleted resources should return 410 Gone.
    pub fn return_gone(&self) -> bool {
        self.config.return_gone
    }

    /// Returns whether contained adds assign ids when none is given.
    pub fn auto_contained_id(&self) -> bool {
        self.config.auto_contained_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nest_persistence::error::StorageResult;
    use nest_persistence::types::StoredResource;
    use serde_json::Value;

    // Mock storage for testing
    struct MockStorage;

    #[async_trait]
    impl ResourceStorage for MockStorage {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn create(&self, _resource_type: &str, _resource: Value) -> StorageResult<StoredResource> {
            unimplemented!()
        }

        async fn create_or_update(
            &self,
            _resource_type: &str,
            _id: &str,
            _resource: Value,
        ) -> StorageResult<(StoredResource, bool)> {
            unimplemented!()
        }

        async fn read(
            &self,
            _resource_type: &str,
            _id: &str,
        ) -> StorageResult<Option<StoredResource>> {
            unimplemented!()
        }

        async fn update(
            &self,
            _current: &StoredResource,
            _resource: Value,
        ) -> StorageResult<StoredResource> {
            unimplemented!()
        }

        async fn delete(&self, _resource_type: &str, _id: &str) -> StorageResult<()> {
            unimplemented!()
        }

        async fn count(&self, _resource_type: Option<&str>) -> StorageResult<u64> {
            unimplemented!()
        }
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());

        assert_eq!(state.storage().backend_name(), "mock");
        assert!(!state.auto_contained_id());
        assert!(state.return_gone());
    }

    #[test]
    fn test_app_state_config_access() {
        let config = ServerConfig {
            base_url: "https://fhir.example.com".to_string(),
            enable_versioning: false,
            require_if_match: true,
            auto_contained_id: true,
            ..Default::default()
        };
        let state = AppState::new(Arc::new(MockStorage), config);

        assert_eq!(state.base_url(), "https://fhir.example.com");
        assert!(!state.versioning_enabled());
        assert!(state.require_if_match());
        assert!(state.auto_contained_id());
    }

    #[test]
    fn test_app_state_clone() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());
        let cloned = state.clone();

        assert_eq!(state.base_url(), cloned.base_url());
        assert!(Arc::ptr_eq(&state.storage_arc(), &cloned.storage_arc()));
    }
}
