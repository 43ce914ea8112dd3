use crate::core_fs::probes::is_directory;
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::{info, warn};

/// Handles the CWD (Change Working Directory) FTP command.
pub async fn handle_cwd_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(change_directory(session, &cmd.argument).await)
}

/// Moves the working directory to `target` if it resolves to a directory
/// inside the sandbox.
pub async fn change_directory(session: &mut Session, target: &str) -> Flow {
    let resolved = session.resolve(target, false).await.into_path();
    let is_dir = match &resolved {
        Some(path) => is_directory(path).await,
        None => false,
    };
    match resolved {
        Some(path) if is_dir => {
            session.working_dir = session.client_path(&path);
            info!(
                "[{}] Directory successfully changed to: {}",
                session.peer(),
                session.working_dir
            );
            Flow::Continue(Reply::new(250, format!("\"{}\"", session.working_dir)))
        }
        _ => {
            warn!("[{}] Failed to change directory to: {}", session.peer(), target);
            Flow::Continue(Reply::new(550, "failed to chdir"))
        }
    }
}
