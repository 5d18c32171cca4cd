//! Server configuration for the FHIR REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NEST_SERVER_PORT` | 8080 | Server port |
//! | `NEST_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `NEST_LOG_LEVEL` | info | Log level |
//! | `NEST_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `NEST_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `NEST_ENABLE_CORS` | true | Enable CORS |
//! | `NEST_CORS_ORIGINS` | * | Allowed origins |
//! | `NEST_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `NEST_CORS_HEADERS` | Content-Type,Accept,If-Match,If-None-Match,Prefer | Allowed headers |
//! | `NEST_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `NEST_RETURN_GONE` | true | 410 instead of 404 for deleted resources |
//! | `NEST_ENABLE_VERSIONING` | true | Emit ETag headers |
//! | `NEST_REQUIRE_IF_MATCH` | false | Demand If-Match on update |
//! | `NEST_AUTO_CONTAINED_ID` | false | Default for `_autoId` when adding contained resources |
//!
//! # Example
//!
//! ```rust
//! use nest_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     auto_contained_id: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::{ArgAction, Parser};

const DEFAULT_CORS_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const DEFAULT_CORS_HEADERS: &str = "Content-Type,Accept,If-Match,If-None-Match,Prefer";

/// Server configuration for the FHIR REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "nest")]
#[command(about = "FHIR server with contained resource management")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "NEST_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "NEST_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "NEST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "NEST_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "NEST_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "NEST_ENABLE_CORS", default_value = "true", action = ArgAction::Set)]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "NEST_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "NEST_CORS_METHODS", default_value = DEFAULT_CORS_METHODS)]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "NEST_CORS_HEADERS", default_value = DEFAULT_CORS_HEADERS)]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers and Bundle links).
    #[arg(long, env = "NEST_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Return deleted resources with 410 Gone instead of 404 Not Found.
    #[arg(long, env = "NEST_RETURN_GONE", default_value = "true", action = ArgAction::Set)]
    pub return_gone: bool,

    /// Enable versioning (ETag support).
    #[arg(long, env = "NEST_ENABLE_VERSIONING", default_value = "true", action = ArgAction::Set)]
    pub enable_versioning: bool,

    /// Require If-Match header for updates.
    #[arg(long, env = "NEST_REQUIRE_IF_MATCH", default_value = "false", action = ArgAction::Set)]
    pub require_if_match: bool,

    /// Generate ids for contained resources added without one, unless the
    /// request says otherwise with `_autoId`.
    #[arg(long, env = "NEST_AUTO_CONTAINED_ID", default_value = "false", action = ArgAction::Set)]
    pub auto_contained_id: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: DEFAULT_CORS_METHODS.to_string(),
            cors_headers: DEFAULT_CORS_HEADERS.to_string(),
            base_url: "http://localhost:8080".to_string(),
            return_gone: true,
            enable_versioning: true,
            require_if_match: false,
            auto_contained_id: false,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Falls back to defaults when the environment cannot be parsed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["nest"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.base_url.trim().is_empty() {
            errors.push("Base URL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:0".to_string(),
            ..Self::default()
        }
    }
}
