use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::info;

/// Handles the QUIT FTP command.
///
/// The goodbye reply is sent by the dispatcher, which then ends the session.
pub async fn handle_quit_command(session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    info!("[{}] Received QUIT command. Closing connection.", session.peer());
    Ok(Flow::Terminate(Reply::new(221, "goodbye")))
}
