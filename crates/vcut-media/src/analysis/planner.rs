//! Keep-interval planning: silence intervals in, kept intervals out.

use vcut_models::{ProcessingConfig, TimeSpan};

/// Compute the intervals to keep for one video.
///
/// Walks the (ordered, disjoint) silence intervals with a cursor, keeping
/// `after_padding` past each silence start and resuming `before_padding`
/// ahead of each silence end, then merges overlapping or adjacent candidates
/// and clamps to `[0, total_duration_secs]`.
///
/// Paddings wide enough to bridge a short silence make the merge pass swallow
/// that gap entirely; silences near the padding width are effectively
/// ignored. No silence at all keeps the whole clip.
pub fn plan_keep_intervals(
    silences: &[TimeSpan],
    config: &ProcessingConfig,
    total_duration_secs: f64,
) -> Vec<TimeSpan> {
    if total_duration_secs <= 0.0 {
        return Vec::new();
    }
    if silences.is_empty() {
        return vec![TimeSpan::new(0.0, total_duration_secs)];
    }

    let mut candidates = Vec::with_capacity(silences.len() + 1);
    let mut cursor = 0.0f64;

    for silence in silences {
        let keep_until = (silence.start + config.after_padding_secs).max(0.0);
        if cursor < keep_until {
            candidates.push(TimeSpan::new(cursor, keep_until));
        }
        cursor = (silence.end - config.before_padding_secs).max(0.0);
    }

    if cursor < total_duration_secs {
        candidates.push(TimeSpan::new(cursor, total_duration_secs));
    }

    let mut keeps = merge_spans(&candidates);
    for keep in &mut keeps {
        keep.start = keep.start.max(0.0);
        keep.end = keep.end.min(total_duration_secs);
    }
    keeps.retain(|keep| !keep.is_empty());
    keeps
}

/// Collapse overlapping or touching spans in a start-ordered list.
///
/// Running this on its own output is a no-op.
pub fn merge_spans(spans: &[TimeSpan]) -> Vec<TimeSpan> {
    let mut merged: Vec<TimeSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(*span),
        }
    }
    merged
}
