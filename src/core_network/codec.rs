use crate::constants::MAX_LINE_LENGTH;
use crate::core_network::connection::Connection;
use crate::error::{FtpError, FtpResult};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// One control line: an uppercased verb (or reply code) and the raw rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub verb: String,
    pub argument: String,
}

impl CommandLine {
    /// Splits a line with its terminator already removed.
    pub fn parse(line: &str) -> Self {
        match line.find(char::is_whitespace) {
            Some(pos) => Self {
                verb: line[..pos].to_ascii_uppercase(),
                argument: line[pos..].trim_start().to_string(),
            },
            None => Self {
                verb: line.to_ascii_uppercase(),
                argument: String::new(),
            },
        }
    }
}

/// Frames a connection into `VERB[ ARGUMENT]\r\n` lines.
#[derive(Debug)]
pub struct LineCodec<S = TcpStream> {
    conn: Connection<S>,
    pending: Vec<u8>,
}

impl<S> LineCodec<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(conn: Connection<S>) -> Self {
        Self {
            conn,
            pending: Vec::new(),
        }
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.conn
    }

    pub fn peer(&self) -> &str {
        self.conn.peer()
    }

    pub fn enable_timeout(&mut self, deadline: Duration) {
        self.conn.enable_timeout(deadline);
    }

    /// Waits for the next full line. `LF` terminates, a preceding `CR` is
    /// dropped. End of stream before a terminator is a transport failure.
    pub async fn receive_line(&mut self) -> FtpResult<CommandLine> {
        let mut chunk = [0u8; 512];
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(CommandLine::parse(&String::from_utf8_lossy(&line)));
            }
            if self.pending.len() >= MAX_LINE_LENGTH {
                return Err(FtpError::Protocol(format!(
                    "line exceeds {} bytes",
                    MAX_LINE_LENGTH
                )));
            }
            let n = self.conn.recv(&mut chunk).await?;
            if n == 0 {
                return Err(FtpError::ConnectionClosed);
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }

    /// Writes `code SP message CRLF` in a single write; the space is left
    /// out when the message is empty.
    pub async fn send_line(&mut self, code: &str, message: &str) -> FtpResult<()> {
        let line = if message.is_empty() {
            format!("{}\r\n", code)
        } else {
            format!("{} {}\r\n", code, message)
        };
        self.conn.send(line.as_bytes()).await
    }

    pub fn into_connection(self) -> Connection<S> {
        self.conn
    }
}
