use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles the ALLO (Allocate) FTP command. No storage is reserved ahead of
/// a STOR.
pub async fn handle_allo_command(_session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(Flow::Continue(Reply::new(202, "superfluous, ALLO ignored")))
}
