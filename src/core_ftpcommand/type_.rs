use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::debug;

/// Handles the TYPE FTP command.
///
/// Every representation type is acknowledged; transfers are always binary.
pub async fn handle_type_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    debug!("[{}] TYPE {} ignored", session.peer(), cmd.argument);
    Ok(Flow::Continue(Reply::new(200, "binary mode is always used")))
}
