// core_ftpcommand/size.rs

use crate::core_fs::probes::file_size;
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::{info, warn};

/// Handles the SIZE (File Size) FTP command.
///
/// Replies with the decimal byte count of a regular file inside the sandbox.
pub async fn handle_size_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    let size = match session.resolve(&cmd.argument, false).await.into_path() {
        Some(path) => file_size(&path).await,
        None => None,
    };
    match size {
        Some(size) => {
            info!("[{}] File size for {} is {}", session.peer(), cmd.argument, size);
            Ok(Flow::Continue(Reply::new(213, size.to_string())))
        }
        None => {
            warn!("[{}] Cannot get size of {}", session.peer(), cmd.argument);
            Ok(Flow::Continue(Reply::new(550, "cannot get size")))
        }
    }
}
