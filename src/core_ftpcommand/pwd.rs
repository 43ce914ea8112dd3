// src/core_ftpcommand/pwd.rs
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::error::FtpResult;
use crate::session::Session;

/// Handles PWD and XPWD: replies with the quoted working directory.
pub async fn handle_pwd_command(session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    Ok(Flow::Continue(Reply::new(
        257,
        format!("\"{}\"", session.working_dir),
    )))
}
