use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_ftpcommand::utils::{finish_transfer, leaf_argument, open_data_connection};
use crate::core_network::codec::CommandLine;
use crate::core_transfer::pump::receive_binary;
use crate::error::FtpResult;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;
use tokio::fs::{File, OpenOptions};

/// Opens `path` for writing, creating it if needed. Existing contents stay
/// until the data connection is up.
async fn open_for_write(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create(true).open(path).await
}

/// Handles the STOR (Store File) FTP command.
///
/// The parent directory must exist inside the sandbox. An existing file is
/// truncated only once the data connection has been accepted, then filled
/// from it until the client closes it.
pub async fn handle_stor_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    let Some(listener) = session.passive_listener.take() else {
        warn!("[{}] STOR without a passive listener", session.peer());
        return Ok(Flow::Continue(Reply::use_passive_first()));
    };

    let failed = || Flow::Continue(Reply::new(550, "failed to open for write"));
    let target = leaf_argument(&cmd.argument);
    let Some(path) = session.resolve(target, true).await.into_path() else {
        warn!("[{}] Cannot resolve {} for STOR", session.peer(), cmd.argument);
        return Ok(failed());
    };
    let mut file = match open_for_write(&path).await {
        Ok(file) => file,
        Err(e) => {
            error!(
                "[{}] Failed to create file: {:?}, error: {}",
                session.peer(),
                path,
                e
            );
            return Ok(failed());
        }
    };

    info!("[{}] Receiving file: {:?}", session.peer(), path);
    let Some(mut conn) = open_data_connection(session, listener, "ready to receive data").await?
    else {
        return Ok(Flow::Continue(Reply::cannot_open_data_connection()));
    };
    let chunk_size = session.config.server.upload_buffer_size;
    let result = match file.set_len(0).await {
        Ok(()) => receive_binary(&mut conn, &mut file, chunk_size).await,
        Err(e) => Err(e.into()),
    };
    Ok(finish_transfer(session.peer(), &mut conn, result, "upload").await)
}
