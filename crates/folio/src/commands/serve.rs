//! Live server command.

use std::path::Path;

use anyhow::Result;
use folio_server::{ServerConfig, WebServer};

use crate::config::load_config;

/// Run the live server.
pub async fn run(config_path: &Path, port: u16, open: bool, watch: bool) -> Result<()> {
    let file_config = load_config(config_path)?;

    tracing::info!("Starting server on port {}", port);

    let config = ServerConfig {
        site: file_config.site_config(),
        port,
        open,
        watch,
        ..Default::default()
    };

    WebServer::new(config).start().await?;

    Ok(())
}
