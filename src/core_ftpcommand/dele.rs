use crate::core_ftpcommand::reply::Flow;
use crate::core_ftpcommand::utils::delete_entry;
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles the DELE (Delete File) FTP command.
///
/// A symlink is removed itself, never its target.
pub async fn handle_dele_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    delete_entry(session, &cmd.argument).await
}
