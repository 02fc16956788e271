//! Windowed volume profile in dB.

use crate::extract::SampleBuffer;

/// Analysis window length in seconds.
pub const WINDOW_SECS: f64 = 0.1;

/// Hop between window starts in seconds (50% overlap).
pub const HOP_SECS: f64 = 0.05;

/// Floor applied to RMS before the log, keeping exact silence finite.
const RMS_EPSILON: f64 = 1e-10;

/// One analysis window: its start time and RMS loudness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    /// Window start time in seconds.
    pub time_secs: f64,
    /// RMS loudness in dB, always finite and <= 0 for normalized input.
    pub db: f64,
}

/// Build a volume profile from a sample buffer.
///
/// Slides a 100ms window with a 50ms hop, computing `20*log10(max(rms, 1e-10))`
/// per window. The final partial window is dropped. Returns an empty profile
/// when the buffer is empty or shorter than one window; callers treat that as
/// "no silence detected".
pub fn build_volume_profile(buffer: &SampleBuffer) -> Vec<VolumePoint> {
    let window = (buffer.sample_rate as f64 * WINDOW_SECS) as usize;
    let hop = (buffer.sample_rate as f64 * HOP_SECS) as usize;

    if window == 0 || hop == 0 || buffer.samples.len() < window {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(buffer.samples.len() / hop + 1);
    let mut start = 0usize;
    while start + window <= buffer.samples.len() {
        let slice = &buffer.samples[start..start + window];
        let mean_square = slice
            .iter()
            .map(|s| (*s as f64) * (*s as f64))
            .sum::<f64>()
            / window as f64;
        let rms = mean_square.sqrt();
        let db = 20.0 * rms.max(RMS_EPSILON).log10();

        points.push(VolumePoint {
            time_secs: start as f64 / buffer.sample_rate as f64,
            db,
        });
        start += hop;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ANALYSIS_SAMPLE_RATE;

    fn buffer_of(samples: Vec<f32>) -> SampleBuffer {
        SampleBuffer {
            samples,
            sample_rate: ANALYSIS_SAMPLE_RATE,
        }
    }

    #[test]
    fn empty_buffer_gives_empty_profile() {
        assert!(build_volume_profile(&buffer_of(Vec::new())).is_empty());
    }

    #[test]
    fn sub_window_buffer_gives_empty_profile() {
        // One window is 2205 samples at the analysis rate
        let buffer = buffer_of(vec![0.5; 2000]);
        assert!(build_volume_profile(&buffer).is_empty());
    }

    #[test]
    fn exact_silence_stays_finite() {
        let buffer = buffer_of(vec![0.0; ANALYSIS_SAMPLE_RATE as usize]);
        let profile = build_volume_profile(&buffer);
        assert!(!profile.is_empty());
        for point in &profile {
            assert!(point.db.is_finite());
            assert!((point.db - (-200.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn db_is_nonpositive_and_finite_for_normalized_input() {
        let samples: Vec<f32> = (0..ANALYSIS_SAMPLE_RATE)
            .map(|i| (i as f32 * 0.01).sin() * 0.8)
            .collect();
        let profile = build_volume_profile(&buffer_of(samples));
        for point in &profile {
            assert!(point.db.is_finite());
            assert!(point.db <= 0.0);
        }
    }

    #[test]
    fn full_scale_square_wave_is_zero_db() {
        let samples = vec![1.0f32; ANALYSIS_SAMPLE_RATE as usize];
        let profile = build_volume_profile(&buffer_of(samples));
        for point in &profile {
            assert!(point.db.abs() < 1e-9);
        }
    }

    #[test]
    fn timestamps_strictly_increase_by_hop() {
        let buffer = buffer_of(vec![0.1; ANALYSIS_SAMPLE_RATE as usize]);
        let profile = build_volume_profile(&buffer);
        let hop = (ANALYSIS_SAMPLE_RATE as f64 * HOP_SECS) as usize;
        for (i, pair) in profile.windows(2).enumerate() {
            assert!(pair[1].time_secs > pair[0].time_secs);
            let expected = (i + 1) * hop;
            assert!((pair[1].time_secs - expected as f64 / ANALYSIS_SAMPLE_RATE as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn final_partial_window_is_dropped() {
        let window = (ANALYSIS_SAMPLE_RATE as f64 * WINDOW_SECS) as usize;
        let hop = (ANALYSIS_SAMPLE_RATE as f64 * HOP_SECS) as usize;
        // Two full windows plus a bit of slack that cannot fit a third
        let buffer = buffer_of(vec![0.2; window + hop + 10]);
        let profile = build_volume_profile(&buffer);
        assert_eq!(profile.len(), 2);
    }
}
