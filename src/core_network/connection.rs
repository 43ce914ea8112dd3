use crate::error::{FtpError, FtpResult};
use log::debug;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// Runs `fut` under `deadline` when one is set.
async fn with_deadline<T, F>(
    deadline: Option<Duration>,
    operation: &'static str,
    fut: F,
) -> FtpResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match deadline {
        None => Ok(fut.await?),
        Some(d) => match tokio::time::timeout(d, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(FtpError::Timeout {
                operation,
                secs: d.as_secs(),
            }),
        },
    }
}

/// A connected byte stream with an optional read/write deadline.
///
/// Control and data connections both use this type; the deadline stays off
/// until [`Connection::enable_timeout`] is called.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    stream: S,
    peer: String,
    deadline: Option<Duration>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            deadline: None,
        }
    }

    pub fn enable_timeout(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Reads at most `buf.len()` bytes; `Ok(0)` means end of stream.
    pub async fn recv(&mut self, buf: &mut [u8]) -> FtpResult<usize> {
        with_deadline(self.deadline, "recv", self.stream.read(buf)).await
    }

    pub async fn send(&mut self, buf: &[u8]) -> FtpResult<()> {
        with_deadline(self.deadline, "send", self.stream.write_all(buf)).await
    }

    /// Flushes and shuts down the write half so the peer sees end of stream.
    pub async fn close(&mut self) -> FtpResult<()> {
        with_deadline(self.deadline, "close", self.stream.shutdown()).await
    }
}

impl Connection<TcpStream> {
    pub async fn connect(host: &str, port: u16) -> FtpResult<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        Self::from_tcp(stream)
    }

    pub fn from_tcp(stream: TcpStream) -> FtpResult<Self> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?.to_string();
        Ok(Self::new(stream, peer))
    }

    pub fn local_addr(&self) -> FtpResult<SocketAddr> {
        Ok(self.stream.local_addr()?)
    }
}

/// A listening socket handing out [`Connection`]s.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    deadline: Option<Duration>,
}

impl Listener {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> FtpResult<Self> {
        let inner = TcpListener::bind(addr).await?;
        Ok(Self {
            inner,
            deadline: None,
        })
    }

    pub fn enable_timeout(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    pub async fn accept(&self) -> FtpResult<Connection> {
        let (stream, addr) = with_deadline(self.deadline, "accept", self.inner.accept()).await?;
        debug!("Accepted connection from {}", addr);
        stream.set_nodelay(true)?;
        Ok(Connection::new(stream, addr.to_string()))
    }

    pub fn local_addr(&self) -> FtpResult<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    pub fn local_port(&self) -> FtpResult<u16> {
        Ok(self.local_addr()?.port())
    }
}
