//! Silence interval detection over a volume profile.
//!
//! # State machine
//!
//! ```text
//!                   window below threshold
//!     ┌────────────────────────────────────────┐
//!     │                                        ▼
//! ┌────────┐                              ┌────────┐
//! │ Voiced │◄─────────────────────────────│ Silent │
//! └────────┘   window at/above threshold  └────────┘
//!                 (emit if long enough)
//! ```
//!
//! The scan ending while `Silent` closes the candidate at the buffer
//! duration, with the same minimum-duration filter.

use tracing::debug;
use vcut_models::TimeSpan;

use super::smoothing::{MaskSmoother, MorphologicalSmoother};
use super::volume::VolumePoint;

/// Scan state threaded through a single left-to-right pass.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// Inside active material.
    Voiced,
    /// Inside a silence candidate that opened at `started_at`.
    Silent { started_at: f64 },
}

/// Extracts ordered, non-overlapping silence intervals from a volume profile.
pub struct SilenceDetector {
    threshold_db: f64,
    min_silence_secs: f64,
    smoother: Box<dyn MaskSmoother>,
}

impl SilenceDetector {
    /// Create a detector with the default morphological smoother.
    pub fn new(threshold_db: f64, min_silence_secs: f64) -> Self {
        Self::with_smoother(
            threshold_db,
            min_silence_secs,
            Box::new(MorphologicalSmoother::default()),
        )
    }

    /// Create a detector with an explicit smoothing strategy.
    pub fn with_smoother(
        threshold_db: f64,
        min_silence_secs: f64,
        smoother: Box<dyn MaskSmoother>,
    ) -> Self {
        Self {
            threshold_db,
            min_silence_secs,
            smoother,
        }
    }

    /// Detect silence intervals.
    ///
    /// `total_duration_secs` is the analyzed buffer's length; it closes a
    /// trailing silence that runs off the end of the profile. An empty
    /// profile yields no intervals.
    pub fn detect(&self, profile: &[VolumePoint], total_duration_secs: f64) -> Vec<TimeSpan> {
        if profile.is_empty() {
            return Vec::new();
        }

        let mask: Vec<bool> = profile.iter().map(|p| p.db < self.threshold_db).collect();
        let mask = self.smoother.smooth(&mask);

        debug!(
            windows = profile.len(),
            threshold_db = self.threshold_db,
            smoother = self.smoother.name(),
            "scanning silence mask"
        );

        let mut intervals = Vec::new();
        let mut state = ScanState::Voiced;

        for (point, &silent) in profile.iter().zip(mask.iter()) {
            state = match (state, silent) {
                (ScanState::Voiced, true) => ScanState::Silent {
                    started_at: point.time_secs,
                },
                (ScanState::Silent { started_at }, false) => {
                    if point.time_secs - started_at >= self.min_silence_secs {
                        intervals.push(TimeSpan::new(started_at, point.time_secs));
                    }
                    ScanState::Voiced
                }
                (state, _) => state,
            };
        }

        // End-of-scan flush for a clip that trails off into silence
        if let ScanState::Silent { started_at } = state {
            if total_duration_secs - started_at >= self.min_silence_secs {
                intervals.push(TimeSpan::new(started_at, total_duration_secs));
            }
        }

        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::smoothing::MajorityVoteSmoother;

    /// Profile stub: one window per 50ms, voiced at -10dB, silent at -60dB.
    fn profile(mask: &str) -> Vec<VolumePoint> {
        mask.chars()
            .enumerate()
            .map(|(i, c)| VolumePoint {
                time_secs: i as f64 * 0.05,
                db: if c == '1' { -60.0 } else { -10.0 },
            })
            .collect()
    }

    /// Detector that sees the mask as-is, so scan logic is tested in isolation.
    struct PassthroughSmoother;
    impl MaskSmoother for PassthroughSmoother {
        fn smooth(&self, mask: &[bool]) -> Vec<bool> {
            mask.to_vec()
        }
        fn name(&self) -> &'static str {
            "passthrough"
        }
    }

    fn raw_detector(min_silence_secs: f64) -> SilenceDetector {
        SilenceDetector::with_smoother(-30.0, min_silence_secs, Box::new(PassthroughSmoother))
    }

    #[test]
    fn empty_profile_detects_nothing() {
        let detector = SilenceDetector::new(-30.0, 0.5);
        assert!(detector.detect(&[], 10.0).is_empty());
    }

    #[test]
    fn all_voiced_detects_nothing() {
        let detector = raw_detector(0.2);
        let prof = profile("00000000000000000000");
        assert!(detector.detect(&prof, 1.0).is_empty());
    }

    #[test]
    fn interior_silence_is_found() {
        let detector = raw_detector(0.2);
        // windows 4..=11 silent: candidate opens at 0.20, closes at 0.60
        let prof = profile("00001111111100000000");
        let intervals = detector.detect(&prof, 1.0);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start - 0.20).abs() < 1e-9);
        assert!((intervals[0].end - 0.60).abs() < 1e-9);
    }

    #[test]
    fn short_silence_is_filtered() {
        let detector = raw_detector(0.5);
        // 0.3s of silence, below the 0.5s minimum
        let prof = profile("00001111110000000000");
        assert!(detector.detect(&prof, 1.0).is_empty());
    }

    #[test]
    fn trailing_silence_closes_at_total_duration() {
        let detector = raw_detector(0.5);
        // Silent from 0.50 to the end of a 1.2s buffer
        let prof = profile("00000000001111111111");
        let intervals = detector.detect(&prof, 1.2);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start - 0.50).abs() < 1e-9);
        assert!((intervals[0].end - 1.2).abs() < 1e-9);
    }

    #[test]
    fn leading_silence_starts_at_zero() {
        let detector = raw_detector(0.2);
        let prof = profile("11111110000000000000");
        let intervals = detector.detect(&prof, 1.0);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start - 0.0).abs() < 1e-9);
        assert!((intervals[0].end - 0.35).abs() < 1e-9);
    }

    #[test]
    fn intervals_are_ordered_and_disjoint() {
        let detector = raw_detector(0.1);
        let prof = profile("001111000111100011110000");
        let intervals = detector.detect(&prof, 1.2);
        assert_eq!(intervals.len(), 3);
        for pair in intervals.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for interval in &intervals {
            assert!(interval.duration_secs() >= 0.1);
        }
    }

    #[test]
    fn min_duration_boundary_is_inclusive() {
        let detector = raw_detector(0.2);
        // Exactly 0.2s: windows 4..=7 silent, closes at 0.40 - 0.20 == min
        let prof = profile("00001111000000000000");
        let intervals = detector.detect(&prof, 1.0);
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn majority_vote_smoother_drops_flicker() {
        let detector = SilenceDetector::with_smoother(
            -30.0,
            0.1,
            Box::new(MajorityVoteSmoother),
        );
        // Single silent window flickers inside voice; the vote removes it
        let prof = profile("00000000100000000000");
        assert!(detector.detect(&prof, 1.0).is_empty());
    }

    #[test]
    fn determinism() {
        let detector = SilenceDetector::new(-30.0, 0.2);
        let prof = profile("000011111111111100000000");
        let first = detector.detect(&prof, 1.2);
        let second = detector.detect(&prof, 1.2);
        assert_eq!(first, second);
    }
}
