//! Subprocess invocation for the external media toolchain.
//!
//! Every ffmpeg/ffprobe call goes through [`MediaCommand`]: a plain argument
//! list plus a timeout. The runner captures stdout/stderr and reports exit
//! status; callers decide which error kind a non-zero status maps to.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Captured result of a finished toolchain subprocess.
#[derive(Debug)]
pub struct CommandOutput {
    /// True when the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Captured stdout bytes.
    pub stdout: Vec<u8>,
    /// Captured stderr bytes.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Last non-empty stderr line, for diagnostics.
    pub fn stderr_tail(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.stderr);
        text.lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
    }
}

/// One bounded invocation of an external media tool.
#[derive(Debug, Clone)]
pub struct MediaCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl MediaCommand {
    /// Invoke `ffmpeg` from PATH.
    pub fn ffmpeg() -> Self {
        Self::new("ffmpeg")
    }

    /// Invoke `ffprobe` from PATH.
    pub fn ffprobe() -> Self {
        Self::new("ffprobe")
    }

    /// Invoke an arbitrary program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(300),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the timeout for this invocation.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run to completion, capturing output.
    ///
    /// Returns `Err` only for spawn failures and timeouts; a non-zero exit
    /// status is reported through [`CommandOutput::success`] so the caller
    /// can attach its own error kind and diagnostics.
    pub async fn run(&self) -> MediaResult<CommandOutput> {
        debug!(
            program = %self.program.display(),
            args = %self.args.join(" "),
            "running media command"
        );

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                // kill_on_drop reaps the child when the wait future is dropped
                warn!(
                    program = %self.program.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "media command timed out"
                );
                return Err(MediaError::Timeout(self.timeout.as_secs()));
            }
        };

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Check that ffmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check that ffprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
