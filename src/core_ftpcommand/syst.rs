use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles the SYST (System) FTP command.
pub async fn handle_syst_command(_session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(Flow::Continue(Reply::new(215, "UNIX Type: L8")))
}
