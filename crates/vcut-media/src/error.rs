//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while analyzing or rendering a video.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("ffprobe not found in PATH")]
    FfprobeNotFound,

    #[error("probe failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("audio extraction failed: {message}")]
    ExtractionFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("encode failed: {message}")]
    EncodeFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid media: {0}")]
    InvalidMedia(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Create an extraction failure error.
    pub fn extraction_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Create an encode failure error.
    pub fn encode_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::EncodeFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }
}
