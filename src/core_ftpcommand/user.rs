use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::info;

/// Handles the USER FTP command. Every user name is accepted.
pub async fn handle_user_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    info!(
        "[{}] Received USER command with username: {}",
        session.peer(),
        cmd.argument
    );
    Ok(Flow::Continue(Reply::new(230, "welcome, any user is accepted")))
}
