use crate::constants::{
    DEFAULT_IO_TIMEOUT_SECS, DEFAULT_LISTEN_PORT, DEFAULT_TRANSFER_BUFFER_SIZE,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: IpAddr,
    pub listen_port: u16,
    pub root_dir: PathBuf,
    /// Address advertised in PASV replies; the control socket's local
    /// address is used when unset.
    pub pasv_address: Option<Ipv4Addr>,
    pub io_timeout_secs: u64,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: DEFAULT_LISTEN_PORT,
            root_dir: PathBuf::from("."),
            pasv_address: None,
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
            upload_buffer_size: DEFAULT_TRANSFER_BUFFER_SIZE,
            download_buffer_size: DEFAULT_TRANSFER_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::parse(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn parse(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        if config.server.upload_buffer_size == 0 || config.server.download_buffer_size == 0 {
            anyhow::bail!("transfer buffer sizes must be non-zero");
        }
        Ok(config)
    }
}
