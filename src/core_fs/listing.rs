use crate::constants::{LISTING_CHUNK_SIZE, LISTING_PROGRAM};
use crate::error::FtpResult;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// Output of a child process, relayed chunk by chunk from stdout and stderr
/// in the order the pipes become readable.
pub struct ChildOutput {
    child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

async fn read_pipe<R: AsyncRead + Unpin>(
    pipe: &mut Option<R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    match pipe {
        Some(pipe) => pipe.read(buf).await,
        None => std::future::pending().await,
    }
}

impl ChildOutput {
    /// Starts `command` with stdin closed and both output streams captured.
    /// The child is killed if this value is dropped before `finish`.
    pub fn spawn(mut command: Command) -> FtpResult<Self> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        Ok(Self {
            child,
            stdout,
            stderr,
        })
    }

    /// Next chunk of output, `None` once both pipes are closed.
    pub async fn next_chunk(&mut self) -> FtpResult<Option<Vec<u8>>> {
        let mut out_buf = [0u8; LISTING_CHUNK_SIZE];
        let mut err_buf = [0u8; LISTING_CHUNK_SIZE];
        loop {
            if self.stdout.is_none() && self.stderr.is_none() {
                return Ok(None);
            }
            let Self { stdout, stderr, .. } = self;
            tokio::select! {
                res = read_pipe(stdout, &mut out_buf) => {
                    let n = res?;
                    if n == 0 {
                        *stdout = None;
                    } else {
                        return Ok(Some(out_buf[..n].to_vec()));
                    }
                }
                res = read_pipe(stderr, &mut err_buf) => {
                    let n = res?;
                    if n == 0 {
                        *stderr = None;
                    } else {
                        return Ok(Some(err_buf[..n].to_vec()));
                    }
                }
            }
        }
    }

    pub async fn finish(mut self) -> FtpResult<ExitStatus> {
        Ok(self.child.wait().await?)
    }
}

/// Builds the listing command for `path`.
///
/// `ls` runs from inside the listed directory (or from the parent of a
/// listed file) and only ever sees a relative name, so neither its output
/// nor its diagnostics carry the server's absolute path.
pub async fn listing_command(path: &Path, show_hidden: bool) -> Command {
    let is_dir = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    let (workdir, target) = match (is_dir, path.parent(), path.file_name()) {
        (false, Some(parent), Some(name)) => (parent, name),
        _ => (path, OsStr::new(".")),
    };

    let mut command = Command::new(LISTING_PROGRAM);
    command.current_dir(workdir).env("LC_ALL", "C").arg("-l");
    if show_hidden {
        command.arg("-a");
    }
    command.arg("--").arg(target);
    command
}
