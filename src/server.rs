use crate::config::Config;
use crate::core_network::connection::Listener;
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A bound control listener together with the sandbox root it serves.
pub struct Server {
    listener: Listener,
    config: Arc<Config>,
    root: PathBuf,
}

impl Server {
    /// Canonicalizes the root directory and binds the control port.
    pub async fn bind(config: Config) -> Result<Self> {
        let root = canonical_root(&config.server.root_dir)?;
        let addr = SocketAddr::new(config.server.listen_address, config.server.listen_port);
        let listener = Listener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind control port {}", addr))?;
        Ok(Self {
            listener,
            config: Arc::new(config),
            root,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn serve_forever(self) -> Result<()> {
        network::start_server(self.listener, self.config, self.root).await?;
        Ok(())
    }
}

fn canonical_root(root_dir: &Path) -> Result<PathBuf> {
    let root = root_dir
        .canonicalize()
        .with_context(|| format!("failed to get realpath for {}", root_dir.display()))?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }
    Ok(root)
}

/// Runs the FTP server with the provided configuration.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start server: {:#}", e);
            return Err(e);
        }
    };
    server.serve_forever().await
}
