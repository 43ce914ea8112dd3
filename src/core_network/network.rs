use crate::config::Config;
use crate::constants::SERVER_NAME;
use crate::core_ftpcommand::handlers::{dispatch, initialize_command_handlers, HandlerTable};
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_log::logger::loggable_command;
use crate::core_network::codec::LineCodec;
use crate::core_network::connection::{Connection, Listener};
use crate::error::{FtpError, FtpResult};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accepts control connections forever, one task per connection.
///
/// A failing accept is logged and retried; a failing or panicking session
/// only ends its own connection.
pub async fn start_server(
    listener: Listener,
    config: Arc<Config>,
    root: PathBuf,
) -> FtpResult<()> {
    info!(
        "Server listening on {}, serving {:?}",
        listener.local_addr()?,
        root
    );
    let handlers = Arc::new(initialize_command_handlers());

    loop {
        let conn = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        let peer = conn.peer().to_string();
        info!("New connection from {}", peer);

        let config = Arc::clone(&config);
        let handlers = Arc::clone(&handlers);
        let root = root.clone();

        tokio::spawn(async move {
            let session = tokio::spawn(async move {
                handle_connection(conn, config, root, handlers).await
            });
            match session.await {
                Ok(Ok(())) => info!("Connection closed for {}", peer),
                Ok(Err(e)) => warn!("Connection error for {}: {}", peer, e),
                Err(e) => error!("Session task for {} panicked: {}", peer, e),
            }
        });
    }
}

/// Serves one control connection until QUIT, end of stream or a transport
/// failure.
pub async fn handle_connection(
    conn: Connection,
    config: Arc<Config>,
    root: PathBuf,
    handlers: Arc<HandlerTable>,
) -> FtpResult<()> {
    let mut ctrl = LineCodec::new(conn);
    ctrl.enable_timeout(config.server.io_timeout());
    let mut session = Session::new(ctrl, root, config);

    session
        .reply(&Reply::new(220, format!("{} ready", SERVER_NAME)))
        .await?;

    loop {
        let cmd = match session.ctrl.receive_line().await {
            Ok(cmd) => cmd,
            Err(FtpError::ConnectionClosed) => {
                debug!("[{}] Client disconnected", session.peer());
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        info!(
            "[{}] --> {}",
            session.peer(),
            loggable_command(&cmd.verb, &cmd.argument)
        );

        match dispatch(&mut session, &handlers, &cmd).await? {
            Flow::Continue(reply) => session.reply(&reply).await?,
            Flow::Terminate(reply) => {
                session.reply(&reply).await?;
                return Ok(());
            }
        }
    }
}
