//! External command execution

use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::error::ExecutionError;

const READ_CHUNK_SIZE: usize = 4096;

/// Outcome of one command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// True when the process exited with status zero
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Standard output and standard error, merged in arrival order
    pub output: String,
    /// Standard output alone
    pub stdout: String,
}

impl CommandResult {
    pub fn trimmed_output(&self) -> &str {
        self.output.trim()
    }

    pub fn trimmed_stdout(&self) -> &str {
        self.stdout.trim()
    }
}

/// Runs an external program in a working directory
///
/// A non-zero exit is a normal [`CommandResult`]. `Err` is reserved for
/// commands that could not be started or did not finish.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<CommandResult, ExecutionError>;
}

/// [`ProcessRunner`] backed by real OS processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill and fail any command still running after `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<CommandResult, ExecutionError> {
        if !dir.is_dir() {
            return Err(ExecutionError::MissingDirectory {
                dir: dir.to_path_buf(),
            });
        }

        // stdin is null so a child can never steal a line meant for the operator
        let child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: program.to_string(),
                dir: dir.to_path_buf(),
                source,
            })?;

        let collected = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, collect_combined(child)).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ExecutionError::TimedOut {
                        program: program.to_string(),
                        dir: dir.to_path_buf(),
                        limit,
                    })
                }
            },
            None => collect_combined(child).await,
        };

        let (status, output, stdout) = collected.map_err(|source| ExecutionError::Spawn {
            program: program.to_string(),
            dir: dir.to_path_buf(),
            source,
        })?;

        Ok(CommandResult {
            success: status.success(),
            code: status.code(),
            output: String::from_utf8_lossy(&output).into_owned(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
        })
    }
}

/// Drains both pipes, then reaps the child
///
/// Returns the merged text and stdout on its own.
async fn collect_combined(mut child: Child) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let mut combined = Vec::new();
    let mut stdout_only = Vec::new();
    let mut out_buf = [0u8; READ_CHUNK_SIZE];
    let mut err_buf = [0u8; READ_CHUNK_SIZE];

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            read = read_some(&mut stdout, &mut out_buf), if stdout.is_some() => {
                match read? {
                    0 => stdout = None,
                    n => {
                        combined.extend_from_slice(&out_buf[..n]);
                        stdout_only.extend_from_slice(&out_buf[..n]);
                    }
                }
            }
            read = read_some(&mut stderr, &mut err_buf), if stderr.is_some() => {
                match read? {
                    0 => stderr = None,
                    n => combined.extend_from_slice(&err_buf[..n]),
                }
            }
        }
    }

    let status = child.wait().await?;
    Ok((status, combined, stdout_only))
}

async fn read_some<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    match reader {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}
