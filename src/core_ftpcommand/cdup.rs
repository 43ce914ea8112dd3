use crate::core_ftpcommand::cwd::change_directory;
use crate::core_ftpcommand::reply::Flow;
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles the CDUP (Change to Parent Directory) FTP command.
///
/// Same as `CWD ..`; at the sandbox root the parent lies outside, so the
/// command fails there.
pub async fn handle_cdup_command(session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(change_directory(session, "..").await)
}
