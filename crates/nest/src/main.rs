//! Nest FHIR Server
//!
//! Serves resources with contained resource management from an in-memory
//! store.

use clap::Parser;
use nest_persistence::backends::InMemoryBackend;
use nest_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        base_url = %config.base_url,
        auto_contained_id = config.auto_contained_id,
        "Starting Nest FHIR Server"
    );

    let app = create_app_with_config(InMemoryBackend::new(), config.clone());
    serve(app, &config).await
}
