use crate::core_network::connection::Connection;
use crate::error::FtpResult;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Rewrites bare `LF` into `CRLF`, remembering whether the previous chunk
/// ended in `CR` so a split `CR`/`LF` pair is not doubled.
#[derive(Debug, Default)]
pub struct CrlfNormalizer {
    last_was_cr: bool,
}

impl CrlfNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(chunk.len() + chunk.len() / 16 + 1);
        for &b in chunk {
            if b == b'\n' && !self.last_was_cr {
                out.push(b'\r');
            }
            out.push(b);
            self.last_was_cr = b == b'\r';
        }
        out
    }
}

/// Streams `source` into the data connection unchanged. Returns the byte
/// count.
pub async fn send_binary<R, S>(
    source: &mut R,
    conn: &mut Connection<S>,
    chunk_size: usize,
) -> FtpResult<u64>
where
    R: AsyncRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let n = source.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        conn.send(&buffer[..n]).await?;
        total += n as u64;
    }
    Ok(total)
}

/// Drains the data connection into `sink` until the peer closes it, then
/// flushes the sink. Returns the byte count.
pub async fn receive_binary<W, S>(
    conn: &mut Connection<S>,
    sink: &mut W,
    chunk_size: usize,
) -> FtpResult<u64>
where
    W: AsyncWrite + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let n = conn.recv(&mut buffer).await?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[..n]).await?;
        total += n as u64;
    }
    sink.flush().await?;
    Ok(total)
}

/// Sends one chunk of listing text with canonical line endings.
pub async fn send_text<S>(
    conn: &mut Connection<S>,
    normalizer: &mut CrlfNormalizer,
    chunk: &[u8],
) -> FtpResult<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let normalized = normalizer.normalize(chunk);
    conn.send(&normalized).await?;
    Ok(normalized.len())
}
