use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::connection::{Connection, Listener};
use crate::core_network::pasv::accept_data_connection;
use crate::error::FtpResult;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;

/// Drops leading `-flag` tokens from a listing argument (`LIST -la dir`).
pub fn strip_list_options(arg: &str) -> &str {
    let mut rest = arg.trim_start();
    while rest.starts_with('-') {
        rest = match rest.find(char::is_whitespace) {
            Some(pos) => rest[pos..].trim_start(),
            None => "",
        };
    }
    rest.trim_end()
}

/// Path argument for commands that defer the leaf: trailing separators
/// would otherwise leave an empty leaf.
pub fn leaf_argument(arg: &str) -> &str {
    let trimmed = arg.trim_end_matches('/');
    if trimmed.is_empty() {
        arg
    } else {
        trimmed
    }
}

/// Sends the 150 preliminary reply and accepts the data connection on the
/// listener taken from the session. `None` means a 425 reply is due.
pub async fn open_data_connection(
    session: &mut Session,
    listener: Listener,
    preliminary: &str,
) -> FtpResult<Option<Connection>> {
    session.reply(&Reply::new(150, preliminary)).await?;
    let deadline = session.config.server.io_timeout();
    match accept_data_connection(listener, deadline, session.peer()).await {
        Ok(conn) => Ok(Some(conn)),
        Err(e) => {
            error!("[{}] Failed to accept data connection: {}", session.peer(), e);
            Ok(None)
        }
    }
}

/// Closes the data connection and picks the completion reply.
pub async fn finish_transfer(
    peer: &str,
    conn: &mut Connection,
    result: FtpResult<u64>,
    what: &str,
) -> Flow {
    let closed = conn.close().await;
    match (result, closed) {
        (Ok(bytes), Ok(())) => {
            info!("[{}] {} finished, {} bytes", peer, what, bytes);
            Flow::Continue(Reply::transfer_complete())
        }
        (Err(e), _) | (Ok(_), Err(e)) => {
            error!("[{}] {} aborted: {}", peer, what, e);
            Flow::Continue(Reply::transfer_aborted())
        }
    }
}

/// Unlinks a file or symlink, or removes an empty directory.
pub async fn remove_path(path: &Path) -> std::io::Result<()> {
    let meta = tokio::fs::symlink_metadata(path).await?;
    if meta.is_dir() {
        tokio::fs::remove_dir(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

/// Shared body of DELE and RMD.
pub async fn delete_entry(session: &mut Session, arg: &str) -> FtpResult<Flow> {
    let failed = || Flow::Continue(Reply::new(550, "failed to delete"));
    let Some(path) = session.resolve(leaf_argument(arg), true).await.into_path() else {
        warn!("[{}] Cannot resolve path for deletion: {}", session.peer(), arg);
        return Ok(failed());
    };
    match remove_path(&path).await {
        Ok(()) => {
            info!("[{}] Deleted {:?}", session.peer(), path);
            Ok(Flow::Continue(Reply::new(250, "delete ok")))
        }
        Err(e) => {
            warn!("[{}] Failed to delete {:?}: {}", session.peer(), path, e);
            Ok(failed())
        }
    }
}
