use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_ftpcommand::utils::leaf_argument;
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;

async fn create_directory(path: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(path).await
}

/// Handles the MKD (Make Directory) FTP command.
///
/// Only the last component is created; a missing parent is an error.
pub async fn handle_mkd_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    let target = leaf_argument(&cmd.argument);
    let Some(path) = session.resolve(target, true).await.into_path() else {
        warn!("[{}] Parent of {} does not exist", session.peer(), cmd.argument);
        return Ok(Flow::Continue(Reply::new(
            550,
            "parent directory does not exist",
        )));
    };

    match create_directory(&path).await {
        Ok(()) => {
            info!("[{}] Directory created successfully: {:?}", session.peer(), path);
            Ok(Flow::Continue(Reply::new(
                257,
                format!("\"{}\" mkdir ok", session.client_path(&path)),
            )))
        }
        Err(e) => {
            error!(
                "[{}] Failed to create directory: {:?}, error: {}",
                session.peer(),
                path,
                e
            );
            Ok(Flow::Continue(Reply::new(550, format!("failed to mkdir: {}", e))))
        }
    }
}
