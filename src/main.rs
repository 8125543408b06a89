//! TRADELUX vehicle server.
//!
//! Usage: `tradelux-server [config.json]`. Without a path the config is read
//! from the platform config directory if present, else defaults are used.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tradelux::config::AppConfig;
use tradelux::record::AirtableClient;
use tradelux::server::{serve, ServerState};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    log::info!("{} starting", config.app_name);

    if let Err(e) = config.require_credentials() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    let client = match AirtableClient::new(&config.record_store) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create record store client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let address = config.server.address();
    let addr = match tokio::net::lookup_host(&address).await.map(|mut addrs| addrs.next()) {
        Ok(Some(addr)) => addr,
        Ok(None) => {
            log::error!("No address found for {}", address);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            log::error!("Failed to resolve {}: {}", address, e);
            return ExitCode::FAILURE;
        }
    };

    let state = ServerState::new(
        Arc::new(client),
        config.server.image_host_policy(),
        config.viewer.clone(),
    );

    match serve(state, addr).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
