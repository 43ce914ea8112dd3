use crate::config::Config;
use crate::core_fs::sandbox::{self, Resolved};
use crate::core_ftpcommand::reply::Reply;
use crate::core_network::codec::LineCodec;
use crate::core_network::connection::Listener;
use crate::error::FtpResult;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-connection state, owned by the task serving that connection.
#[derive(Debug)]
pub struct Session {
    pub ctrl: LineCodec,
    /// Client-visible working directory, always starting with `/`.
    pub working_dir: String,
    /// Pending passive listener; taken by the next data command.
    pub passive_listener: Option<Listener>,
    pub config: Arc<Config>,
    root: PathBuf,
}

impl Session {
    /// `root` must be canonical; it never changes for the session lifetime.
    pub fn new(ctrl: LineCodec, root: PathBuf, config: Arc<Config>) -> Self {
        Self {
            ctrl,
            working_dir: String::from("/"),
            passive_listener: None,
            config,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn peer(&self) -> &str {
        self.ctrl.peer()
    }

    pub async fn resolve(&self, path: &str, allow_missing_leaf: bool) -> Resolved {
        sandbox::resolve(&self.root, &self.working_dir, path, allow_missing_leaf).await
    }

    pub fn client_path(&self, path: &Path) -> String {
        sandbox::client_path(&self.root, path)
    }

    pub async fn reply(&mut self, reply: &Reply) -> FtpResult<()> {
        debug!("[{}] <-- {}", self.ctrl.peer(), reply);
        self.ctrl
            .send_line(&reply.code.to_string(), &reply.message)
            .await
    }
}
