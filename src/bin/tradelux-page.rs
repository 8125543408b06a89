//! Render a vehicle page from a running server and print it as JSON.
//!
//! Usage: `tradelux-page <vehicle-id> [server-url]`

use std::process::ExitCode;

use tradelux::app::VehicleViewer;
use tradelux::loader::ApiClient;
use tradelux_viewer::ViewerConfig;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let Some(vehicle_id) = args.next() else {
        eprintln!("Usage: tradelux-page <vehicle-id> [server-url]");
        return ExitCode::FAILURE;
    };
    let server = args.next().unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let client = match ApiClient::new(&server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut viewer = VehicleViewer::new(client, vehicle_id, ViewerConfig::default());
    viewer.refresh().await;

    match serde_json::to_string_pretty(&viewer.view()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize page: {}", e);
            ExitCode::FAILURE
        }
    }
}
