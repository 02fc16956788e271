//! Render plans: how the kept intervals become an output file.

use serde::{Deserialize, Serialize};

use crate::interval::TimeSpan;

/// How the encoder should materialize the kept intervals.
///
/// Chosen deterministically from the keep-interval list and the total
/// duration; consumed exactly once by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPlan {
    /// The kept interval is effectively the whole clip: container-level
    /// stream copy, no re-encode.
    CopyWhole,
    /// A single kept interval that needs a re-encoded trim.
    TrimSingle(TimeSpan),
    /// Multiple kept intervals concatenated into one output.
    ConcatSegments(Vec<TimeSpan>),
}

impl RenderPlan {
    /// Short strategy name for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CopyWhole => "copy_whole",
            Self::TrimSingle(_) => "trim_single",
            Self::ConcatSegments(_) => "concat_segments",
        }
    }

    /// Number of encoder input segments this plan implies.
    pub fn segment_count(&self) -> usize {
        match self {
            Self::CopyWhole | Self::TrimSingle(_) => 1,
            Self::ConcatSegments(spans) => spans.len(),
        }
    }
}
