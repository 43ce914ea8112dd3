use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments of the server
#[derive(Parser, Debug)]
#[command(name = "sandftpd", about = "A sandboxed anonymous FTP server.")]
pub struct ServerCli {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory served as the FTP root
    #[arg(short = 'd', long)]
    pub root_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerCli {
    /// Flags win over values loaded from the configuration file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.listen_port = port;
        }
        if let Some(root_dir) = &self.root_dir {
            config.server.root_dir = root_dir.clone();
        }
    }
}

/// Command-line arguments of the interactive client
#[derive(Parser, Debug)]
#[command(name = "sandftp-client", about = "Interactive client for sandftpd.")]
pub struct ClientCli {
    /// Server host name or address
    pub host: String,

    /// Server control port
    pub port: u16,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
