//! Development server command.

use std::path::PathBuf;

use anyhow::Result;

use portico_server::{DevServer, DevServerConfig};

/// Run the dev server.
pub async fn run(config_path: PathBuf, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let root_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = DevServerConfig {
        config_path,
        root_dir,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
