//! FaceGate webhook server binary.

use facegate_server::{ServerConfig, WebhookConfig, WebhookServer, load_config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration file is optional; defaults serve the common case.
    let (server_config, webhook_config) = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => (ServerConfig::default(), WebhookConfig::default()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server_config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server = WebhookServer::new(server_config, webhook_config)?;
    server.run().await
}
