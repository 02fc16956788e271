//! Volume sampling for threshold calibration.
//!
//! Measures a short window of the clip and returns an aggregate loudness
//! figure. This is a best-effort calibration hint: any fault comes back as a
//! fixed sentinel instead of an error, so callers can always show something.

use std::path::Path;

use tracing::warn;

use crate::analysis::{build_volume_profile, VolumePoint};
use crate::error::{MediaError, MediaResult};
use crate::extract::extract_samples;

/// Default sampling window length in seconds.
pub const DEFAULT_SAMPLE_WINDOW_SECS: f64 = 5.0;

/// Returned when the sample window cannot be measured.
pub const SAMPLER_FAULT_SENTINEL_DB: f64 = -40.0;

/// Offset subtracted from a measurement to suggest a silence threshold.
const SUGGESTED_THRESHOLD_OFFSET_DB: f64 = 10.0;

/// Measure the loudness of `[start, start + duration)`.
///
/// The aggregate is the RMS of the per-window dB values of the volume
/// profile, not the RMS of the raw samples, so it comes out as a positive
/// magnitude; [`suggested_threshold_db`] works on that scale. Any extraction
/// or analysis fault yields [`SAMPLER_FAULT_SENTINEL_DB`].
pub async fn sample_volume(
    input: impl AsRef<Path>,
    start_secs: f64,
    duration_secs: f64,
) -> f64 {
    match try_sample(input.as_ref(), start_secs, duration_secs).await {
        Ok(measured) => measured,
        Err(error) => {
            warn!(
                input = %input.as_ref().display(),
                %error,
                "volume sampling failed, using sentinel"
            );
            SAMPLER_FAULT_SENTINEL_DB
        }
    }
}

/// Suggested silence threshold for a measurement, per the calibration rule
/// `measured - 10`.
pub fn suggested_threshold_db(measured_db: f64) -> f64 {
    measured_db - SUGGESTED_THRESHOLD_OFFSET_DB
}

async fn try_sample(input: &Path, start_secs: f64, duration_secs: f64) -> MediaResult<f64> {
    let buffer = extract_samples(input, start_secs, Some(duration_secs)).await?;
    let profile = build_volume_profile(&buffer);
    rms_of_db(&profile).ok_or_else(|| {
        MediaError::InvalidMedia("sample window too short to analyze".to_string())
    })
}

/// RMS over the profile's dB values. `None` for an empty profile.
fn rms_of_db(profile: &[VolumePoint]) -> Option<f64> {
    if profile.is_empty() {
        return None;
    }
    let mean_square =
        profile.iter().map(|p| p.db * p.db).sum::<f64>() / profile.len() as f64;
    Some(mean_square.sqrt())
}
