//! Strata File Server - Entry Point
//!
//! A file-transfer server with pluggable filesystem providers: each user is
//! backed either by a direct physical-path provider or by a mount-mapped
//! indirection provider.

use log::{info, warn};

use strata_file_server::Server;
use strata_file_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching file server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.toml ({}), using defaults", e);
            ServerConfig::default()
        }
    };

    let server = Server::new(config).await;
    server.start().await;
}
