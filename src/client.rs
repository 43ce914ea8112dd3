use crate::constants::{DEFAULT_IO_TIMEOUT_SECS, DEFAULT_TRANSFER_BUFFER_SIZE};
use crate::core_network::codec::{CommandLine, LineCodec};
use crate::core_network::connection::Connection;
use crate::core_network::pasv::parse_pasv_reply;
use crate::core_transfer::pump::{receive_binary, send_binary};
use crate::error::{FtpError, FtpResult};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// Client side of a control connection.
///
/// Every reply whose code does not start with `1` or `2` fails the current
/// operation with [`FtpError::UnexpectedReply`]; the connection stays usable
/// afterwards.
#[derive(Debug)]
pub struct FtpClient {
    ctrl: LineCodec,
    deadline: Duration,
}

impl FtpClient {
    /// Connects, reads the greeting and logs in anonymously in binary mode.
    pub async fn connect(host: &str, port: u16) -> FtpResult<Self> {
        let conn = Connection::connect(host, port).await?;
        info!("Connected to {}", conn.peer());
        let deadline = Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS);
        let mut ctrl = LineCodec::new(conn);
        ctrl.enable_timeout(deadline);

        let mut client = Self { ctrl, deadline };
        client.get_reply().await?;
        client.send_cmd("USER", "anonymous").await?;
        client.send_cmd("TYPE", "I").await?;
        Ok(client)
    }

    /// Sends `VERB[ ARG]` and waits for its reply.
    pub async fn send_cmd(&mut self, verb: &str, arg: &str) -> FtpResult<CommandLine> {
        if arg.is_empty() {
            debug!("--> {}", verb);
        } else {
            debug!("--> {} {}", verb, arg);
        }
        self.ctrl.send_line(verb, arg).await?;
        self.get_reply().await
    }

    pub async fn get_reply(&mut self) -> FtpResult<CommandLine> {
        let reply = self.ctrl.receive_line().await?;
        if !reply.verb.starts_with(['1', '2']) {
            warn!("bad response: {} {}", reply.verb, reply.argument);
            return Err(FtpError::UnexpectedReply {
                code: reply.verb,
                message: reply.argument,
            });
        }
        debug!("<-- {} {}", reply.verb, reply.argument);
        Ok(reply)
    }

    async fn open_pasv_data_conn(&mut self) -> FtpResult<Connection> {
        let reply = self.send_cmd("PASV", "").await?;
        let addr = parse_pasv_reply(&reply.argument)?;
        debug!("Opening data connection to {}", addr);
        let mut conn = Connection::connect(&addr.ip().to_string(), addr.port()).await?;
        conn.enable_timeout(self.deadline);
        Ok(conn)
    }

    /// Copies the server's directory listing into `out`.
    pub async fn list<W>(&mut self, out: &mut W) -> FtpResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut data = self.open_pasv_data_conn().await?;
        self.send_cmd("LIST", "").await?;
        let received = receive_binary(&mut data, out, DEFAULT_TRANSFER_BUFFER_SIZE).await?;
        self.get_reply().await?;
        Ok(received)
    }

    pub async fn chdir(&mut self, dir: &str) -> FtpResult<()> {
        self.send_cmd("CWD", dir).await?;
        Ok(())
    }

    pub async fn remove(&mut self, name: &str) -> FtpResult<()> {
        self.send_cmd("DELE", name).await?;
        Ok(())
    }

    pub async fn mkdir(&mut self, dir: &str) -> FtpResult<()> {
        self.send_cmd("MKD", dir).await?;
        Ok(())
    }

    /// Current remote working directory.
    pub async fn pwd(&mut self) -> FtpResult<String> {
        let reply = self.send_cmd("PWD", "").await?;
        quoted_path(&reply.argument)
            .map(str::to_string)
            .ok_or_else(|| FtpError::Protocol(format!("bad response for PWD: {}", reply.argument)))
    }

    pub async fn size(&mut self, name: &str) -> FtpResult<u64> {
        let reply = self.send_cmd("SIZE", name).await?;
        reply
            .argument
            .trim()
            .parse()
            .map_err(|_| FtpError::Protocol(format!("bad response for SIZE: {}", reply.argument)))
    }

    /// Uploads everything `source` yields as `remote_name`.
    pub async fn put<R>(&mut self, remote_name: &str, source: &mut R) -> FtpResult<u64>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = self.open_pasv_data_conn().await?;
        self.send_cmd("STOR", remote_name).await?;
        let sent = send_binary(source, &mut data, DEFAULT_TRANSFER_BUFFER_SIZE).await?;
        data.close().await?;
        drop(data);
        self.get_reply().await?;
        Ok(sent)
    }

    /// Downloads `remote_name` into `sink`.
    pub async fn get<W>(&mut self, remote_name: &str, sink: &mut W) -> FtpResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut data = self.open_pasv_data_conn().await?;
        self.send_cmd("RETR", remote_name).await?;
        let received = receive_binary(&mut data, sink, DEFAULT_TRANSFER_BUFFER_SIZE).await?;
        drop(data);
        self.get_reply().await?;
        Ok(received)
    }

    pub async fn quit(mut self) -> FtpResult<()> {
        self.send_cmd("QUIT", "").await?;
        if let Err(e) = self.ctrl.into_connection().close().await {
            debug!("Closing control connection: {}", e);
        }
        Ok(())
    }
}

fn quoted_path(text: &str) -> Option<&str> {
    let start = text.find('"')?;
    let end = text.rfind('"')?;
    (end > start).then(|| &text[start + 1..end])
}

/// Splits a shell line into its command word and the trimmed rest.
pub fn parse_user_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim_start()),
        None => (line, ""),
    }
}
