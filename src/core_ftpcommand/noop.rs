use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

pub async fn handle_noop_command(_session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(Flow::Continue(Reply::new(200, "ok")))
}
