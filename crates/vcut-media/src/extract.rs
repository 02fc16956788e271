//! Audio sample extraction for analysis.
//!
//! Decodes a time window of the source into mono 16-bit PCM at the fixed
//! analysis rate, normalized to f32 in [-1, 1]. The buffer is owned by the
//! calling analysis step and discarded after use.

use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::command::{check_ffmpeg, MediaCommand};
use crate::error::{MediaError, MediaResult};

/// Fixed sample rate for silence analysis.
pub const ANALYSIS_SAMPLE_RATE: u32 = 22050;

/// Timeout for decoding a clip's audio track.
const EXTRACT_TIMEOUT_SECS: u64 = 300;

/// Decoded mono audio samples at a known rate.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Normalized amplitudes in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SampleBuffer {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples were decoded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Buffer length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Extract mono analysis samples from a media file.
///
/// `duration_secs` of `None` decodes to the end of the clip. The seek and
/// duration are applied on the output side of the decode for accuracy.
pub async fn extract_samples(
    input: impl AsRef<Path>,
    start_secs: f64,
    duration_secs: Option<f64>,
) -> MediaResult<SampleBuffer> {
    let input = input.as_ref();

    check_ffmpeg()?;

    let temp_audio = NamedTempFile::with_suffix(".pcm")?;

    let mut cmd = MediaCommand::ffmpeg()
        .args(["-v", "error", "-i"])
        .arg(input.to_string_lossy());

    if start_secs > 0.0 {
        cmd = cmd.arg("-ss").arg(format!("{:.3}", start_secs));
    }
    if let Some(duration) = duration_secs {
        cmd = cmd.arg("-t").arg(format!("{:.3}", duration));
    }

    let output = cmd
        .args(["-vn", "-acodec", "pcm_s16le"])
        .args(["-ar", &ANALYSIS_SAMPLE_RATE.to_string()])
        .args(["-ac", "1", "-f", "s16le", "-y"])
        .arg(temp_audio.path().to_string_lossy())
        .timeout(Duration::from_secs(EXTRACT_TIMEOUT_SECS))
        .run()
        .await?;

    if !output.success {
        return Err(MediaError::extraction_failed(
            format!("ffmpeg exited with code {:?}", output.exit_code),
            output.stderr_tail(),
        ));
    }

    let bytes = tokio::fs::read(temp_audio.path()).await?;
    let samples = decode_s16le(&bytes);

    debug!(
        input = %input.display(),
        samples = samples.len(),
        sample_rate = ANALYSIS_SAMPLE_RATE,
        "audio extraction complete"
    );

    Ok(SampleBuffer {
        samples,
        sample_rate: ANALYSIS_SAMPLE_RATE,
    })
}

/// Convert raw little-endian s16 PCM bytes to normalized f32 samples.
fn decode_s16le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_s16le_bytes() {
        let raw: Vec<u8> = [0i16, 16384, -16384, i16::MAX, i16::MIN]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let samples = decode_s16le(&raw);
        assert_eq!(samples.len(), 5);
        assert!((samples[0] - 0.0).abs() < 1e-6);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] + 0.5).abs() < 1e-6);
        assert!(samples[3] < 1.0 && samples[3] > 0.999);
        assert!((samples[4] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn decode_drops_trailing_odd_byte() {
        let samples = decode_s16le(&[0, 0, 7]);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn buffer_duration() {
        let buffer = SampleBuffer {
            samples: vec![0.0; ANALYSIS_SAMPLE_RATE as usize * 2],
            sample_rate: ANALYSIS_SAMPLE_RATE,
        };
        assert!((buffer.duration_secs() - 2.0).abs() < 1e-9);
        assert!(!buffer.is_empty());
    }
}
