use crate::core_ftpcommand::reply::Flow;
use crate::core_ftpcommand::utils::delete_entry;
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles the RMD (Remove Directory) FTP command. Only empty directories
/// can be removed.
pub async fn handle_rmd_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    delete_entry(session, &cmd.argument).await
}
