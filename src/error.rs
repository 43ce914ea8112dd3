use thiserror::Error;

/// Failures that escape a command handler or a client operation.
///
/// Recoverable command failures (missing file, no passive listener, ...) are
/// not represented here: they are answered with a status reply and the
/// session goes on.
#[derive(Error, Debug)]
pub enum FtpError {
    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("unexpected reply: {code} {message}")]
    UnexpectedReply { code: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FtpError {
    /// Whether the error only aborts the operation in progress, leaving the
    /// control connection usable.
    pub fn aborts_command_only(&self) -> bool {
        matches!(self, FtpError::Protocol(_) | FtpError::UnexpectedReply { .. })
    }
}

pub type FtpResult<T> = Result<T, FtpError>;
