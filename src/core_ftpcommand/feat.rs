use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;
use log::info;

/// Handles the FEAT (Feature) FTP command.
///
/// No extensions are advertised.
pub async fn handle_feat_command(session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    info!("[{}] Responding to FEAT with no extra features.", session.peer());
    Ok(Flow::Continue(Reply::new(211, "no extra features")))
}
