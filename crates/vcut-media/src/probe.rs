//! FFprobe media information.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::command::{check_ffprobe, MediaCommand};
use crate::error::{MediaError, MediaResult};

/// Timeout for metadata probes. Probes read headers only and finish fast.
const PROBE_TIMEOUT_SECS: u64 = 30;

/// Media file information relevant to silence analysis.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Audio sample rate in Hz, when an audio stream is present.
    pub sample_rate: Option<u32>,
    /// Video codec name, when a video stream is present.
    pub video_codec: Option<String>,
    /// Audio codec name, when an audio stream is present.
    pub audio_codec: Option<String>,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    sample_rate: Option<String>,
}

/// Probe a media file for duration, sample rate and codecs.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = MediaCommand::ffprobe()
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path.to_string_lossy())
        .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
        .run()
        .await?;

    if !output.success {
        return Err(MediaError::probe_failed(
            format!("ffprobe exited with code {:?}", output.exit_code),
            output.stderr_tail(),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let duration_secs = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::InvalidMedia("container reports no duration".to_string()))?;

    let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");
    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");

    Ok(MediaInfo {
        duration_secs,
        sample_rate: audio_stream
            .and_then(|s| s.sample_rate.as_deref())
            .and_then(|r| r.parse().ok()),
        video_codec: video_stream.and_then(|s| s.codec_name.clone()),
        audio_codec: audio_stream.and_then(|s| s.codec_name.clone()),
    })
}
