//! Per-video processing outcome.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::interval::TimeSpan;

/// Structured result of processing one video.
///
/// Carries everything a batch caller needs for logs and reports; the engine
/// itself writes nothing but the output media and its scoped temp files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOutcome {
    /// Source file.
    pub input_path: PathBuf,
    /// Destination file (set even on failure, for report readability).
    pub output_path: PathBuf,
    /// Whether the output file was produced.
    pub success: bool,
    /// Failure description when `success` is false.
    pub error: Option<String>,
    /// Detected silence intervals (empty when analysis never ran).
    pub silence_intervals: Vec<TimeSpan>,
    /// Intervals kept in the output.
    pub keep_intervals: Vec<TimeSpan>,
    /// Wall-clock processing time in seconds.
    pub elapsed_secs: f64,
}

impl VideoOutcome {
    /// A successful outcome.
    pub fn succeeded(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        silence_intervals: Vec<TimeSpan>,
        keep_intervals: Vec<TimeSpan>,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            success: true,
            error: None,
            silence_intervals,
            keep_intervals,
            elapsed_secs,
        }
    }

    /// A failed outcome.
    pub fn failed(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        error: impl Into<String>,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            success: false,
            error: Some(error.into()),
            silence_intervals: Vec::new(),
            keep_intervals: Vec::new(),
            elapsed_secs,
        }
    }

    /// Total seconds of detected silence.
    pub fn silence_secs(&self) -> f64 {
        self.silence_intervals.iter().map(TimeSpan::duration_secs).sum()
    }

    /// Total seconds kept in the output.
    pub fn kept_secs(&self) -> f64 {
        self.keep_intervals.iter().map(TimeSpan::duration_secs).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_outcome_totals() {
        let outcome = VideoOutcome::succeeded(
            "in.mp4",
            "out.mp4",
            vec![TimeSpan::new(2.0, 4.0), TimeSpan::new(6.0, 9.0)],
            vec![
                TimeSpan::new(0.0, 2.2),
                TimeSpan::new(3.9, 6.2),
                TimeSpan::new(8.9, 11.0),
            ],
            1.25,
        );
        assert!(outcome.success);
        assert!(outcome.error.is_none());
        assert!((outcome.silence_secs() - 5.0).abs() < 1e-9);
        assert!((outcome.kept_secs() - 6.6).abs() < 1e-9);
    }

    #[test]
    fn failure_outcome_is_empty() {
        let outcome = VideoOutcome::failed("in.mp4", "out.mp4", "encode failed", 0.5);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("encode failed"));
        assert!(outcome.silence_intervals.is_empty());
        assert!(outcome.keep_intervals.is_empty());
    }
}
