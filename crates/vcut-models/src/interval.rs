//! Time intervals in seconds.

use serde::{Deserialize, Serialize};

/// A half-open stretch of media time, `start < end`, in seconds.
///
/// Used both for detected silence intervals and for the intervals kept in
/// the output. Lists of spans produced by the analysis stages are strictly
/// ordered and pairwise non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl TimeSpan {
    /// Create a new span.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the span in seconds (zero for degenerate spans).
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// True when the span covers no time.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s-{:.2}s", self.start, self.end)
    }
}
