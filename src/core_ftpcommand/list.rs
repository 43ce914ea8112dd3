use crate::core_fs::listing::{listing_command, ChildOutput};
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_ftpcommand::utils::{finish_transfer, open_data_connection, strip_list_options};
use crate::core_network::codec::CommandLine;
use crate::core_network::connection::Connection;
use crate::core_transfer::pump::{send_text, CrlfNormalizer};
use crate::error::FtpResult;
use crate::session::Session;
use log::{debug, warn};
use std::path::Path;

/// Handles the LIST FTP command: long listing including hidden entries.
pub async fn handle_list_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    list_directory(session, cmd, true).await
}

/// Handles the NLST FTP command: long listing without hidden entries.
pub async fn handle_nlst_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    list_directory(session, cmd, false).await
}

async fn list_directory(
    session: &mut Session,
    cmd: &CommandLine,
    show_hidden: bool,
) -> FtpResult<Flow> {
    let Some(listener) = session.passive_listener.take() else {
        warn!("[{}] {} without a passive listener", session.peer(), cmd.verb);
        return Ok(Flow::Continue(Reply::use_passive_first()));
    };

    let target = strip_list_options(&cmd.argument);
    let Some(dir) = session.resolve(target, false).await.into_path() else {
        warn!("[{}] Cannot list {:?}", session.peer(), target);
        return Ok(Flow::Continue(Reply::new(550, "failed to list directory")));
    };
    debug!("[{}] Listing {:?}", session.peer(), dir);

    let Some(mut conn) =
        open_data_connection(session, listener, "here comes the directory listing").await?
    else {
        return Ok(Flow::Continue(Reply::cannot_open_data_connection()));
    };
    let result = stream_listing(&mut conn, &dir, show_hidden).await;
    Ok(finish_transfer(session.peer(), &mut conn, result, "directory listing").await)
}

async fn stream_listing(conn: &mut Connection, dir: &Path, show_hidden: bool) -> FtpResult<u64> {
    let mut output = ChildOutput::spawn(listing_command(dir, show_hidden).await)?;
    let mut normalizer = CrlfNormalizer::new();
    let mut total = 0u64;
    while let Some(chunk) = output.next_chunk().await? {
        total += send_text(conn, &mut normalizer, &chunk).await? as u64;
    }
    let status = output.finish().await?;
    if !status.success() {
        warn!("Listing of {:?} exited with {}", dir, status);
    }
    Ok(total)
}
