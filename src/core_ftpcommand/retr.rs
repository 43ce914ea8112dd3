use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_ftpcommand::utils::{finish_transfer, open_data_connection};
use crate::core_network::codec::CommandLine;
use crate::core_transfer::pump::send_binary;
use crate::error::FtpResult;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;
use tokio::fs::File;

/// Opens `path` for reading if it is a regular file.
async fn open_regular_file(path: &Path) -> std::io::Result<File> {
    let file = File::open(path).await?;
    if !file.metadata().await?.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    Ok(file)
}

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams the file's bytes unchanged over the pending passive data
/// connection.
pub async fn handle_retr_command(session: &mut Session, cmd: &CommandLine) -> FtpResult<Flow> {
    let Some(listener) = session.passive_listener.take() else {
        warn!("[{}] RETR without a passive listener", session.peer());
        return Ok(Flow::Continue(Reply::use_passive_first()));
    };

    let failed = || Flow::Continue(Reply::new(550, "failed to open"));
    let Some(path) = session.resolve(&cmd.argument, false).await.into_path() else {
        warn!("[{}] Cannot resolve {} for RETR", session.peer(), cmd.argument);
        return Ok(failed());
    };
    let mut file = match open_regular_file(&path).await {
        Ok(file) => file,
        Err(e) => {
            error!(
                "[{}] File not found or could not be opened: {:?}, error: {}",
                session.peer(),
                path,
                e
            );
            return Ok(failed());
        }
    };

    info!("[{}] Sending file: {:?}", session.peer(), path);
    let Some(mut conn) = open_data_connection(session, listener, "opening data connection").await?
    else {
        return Ok(Flow::Continue(Reply::cannot_open_data_connection()));
    };
    let chunk_size = session.config.server.download_buffer_size;
    let result = send_binary(&mut file, &mut conn, chunk_size).await;
    Ok(finish_transfer(session.peer(), &mut conn, result, "download").await)
}
