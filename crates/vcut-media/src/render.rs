//! Render strategy selection and execution.
//!
//! Selection is pure: the keep-interval list and total duration map to a
//! [`RenderPlan`]. Execution goes through the [`Encoder`] trait so the
//! multi-segment fallback logic can be exercised without a real toolchain.
//!
//! # Strategy
//!
//! - one interval spanning effectively the whole clip: container stream copy
//! - one interval otherwise: single re-encoded trim
//! - several intervals: one-pass filter-graph concatenation; if that fails,
//!   fall back exactly once to per-segment extraction plus a lossless
//!   concat-demux over the temporary files

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};

use vcut_models::{RenderPlan, TimeSpan};

use crate::command::{check_ffmpeg, MediaCommand};
use crate::error::{MediaError, MediaResult};

/// A single keep interval starting within this of zero counts as "from the
/// start". Tunable, kept in sync with the copy-vs-trim tests.
pub const FULL_START_TOLERANCE_SECS: f64 = 0.1;

/// A single keep interval ending within this of the total duration counts as
/// "to the end". Wider than the start tolerance on purpose: container
/// timestamps get imprecise near the end of a clip. Tunable, kept in sync
/// with the copy-vs-trim tests.
pub const FULL_END_TOLERANCE_SECS: f64 = 1.0;

/// Timeout for full encodes and concatenations.
const ENCODE_TIMEOUT_SECS: u64 = 1800;

/// Choose how to materialize the keep intervals.
pub fn select_render_plan(
    keep_intervals: &[TimeSpan],
    total_duration_secs: f64,
) -> MediaResult<RenderPlan> {
    match keep_intervals {
        [] => Err(MediaError::InvalidMedia(
            "no keep intervals to render".to_string(),
        )),
        [only] => {
            let nearly_whole = only.start < FULL_START_TOLERANCE_SECS
                && total_duration_secs - only.end < FULL_END_TOLERANCE_SECS;
            if nearly_whole {
                Ok(RenderPlan::CopyWhole)
            } else {
                Ok(RenderPlan::TrimSingle(*only))
            }
        }
        many => Ok(RenderPlan::ConcatSegments(many.to_vec())),
    }
}

/// The external media encoder, as the engine sees it.
///
/// All operations report success or failure with diagnostic text and obey
/// the engine's timeouts. [`FfmpegEncoder`] is the production implementation.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Container-level stream copy of the whole input.
    async fn copy_whole(&self, input: &Path, output: &Path) -> MediaResult<()>;

    /// Re-encoded trim of `[start, start + duration)`.
    async fn trim_reencode(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> MediaResult<()>;

    /// Decode each segment as a labeled input and concatenate them through a
    /// single filter graph, re-encoding once.
    async fn concat_filter_graph(
        &self,
        input: &Path,
        output: &Path,
        segments: &[TimeSpan],
    ) -> MediaResult<()>;

    /// Losslessly concatenate pre-encoded files sharing identical parameters.
    async fn concat_demux(&self, segment_files: &[PathBuf], output: &Path) -> MediaResult<()>;
}

/// Execute a render plan against an encoder.
///
/// The multi-segment case tries the filter-graph concatenation first and the
/// demux fallback exactly once; fallback failure is terminal. The fallback's
/// working directory is removed on every exit path.
pub async fn execute_plan(
    encoder: &dyn Encoder,
    input: &Path,
    output: &Path,
    plan: &RenderPlan,
) -> MediaResult<()> {
    info!(
        input = %input.display(),
        output = %output.display(),
        strategy = plan.kind(),
        segments = plan.segment_count(),
        "rendering"
    );

    match plan {
        RenderPlan::CopyWhole => encoder.copy_whole(input, output).await,
        RenderPlan::TrimSingle(span) => {
            encoder
                .trim_reencode(input, output, span.start, span.duration_secs())
                .await
        }
        RenderPlan::ConcatSegments(segments) => {
            match encoder.concat_filter_graph(input, output, segments).await {
                Ok(()) => Ok(()),
                Err(primary) => {
                    warn!(
                        error = %primary,
                        "filter-graph concatenation failed, trying demux fallback"
                    );
                    counter!("vcut_concat_fallback_total").increment(1);
                    concat_demux_fallback(encoder, input, output, segments).await
                }
            }
        }
    }
}

/// Extract each segment into a scoped temp dir, then concat-demux the parts.
async fn concat_demux_fallback(
    encoder: &dyn Encoder,
    input: &Path,
    output: &Path,
    segments: &[TimeSpan],
) -> MediaResult<()> {
    // TempDir removes the working directory when dropped, on success and on
    // every early return below.
    let work_dir = tempfile::tempdir()?;
    let mut segment_files = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let segment_file = work_dir.path().join(format!("segment_{index:04}.mp4"));
        info!(
            segment = index + 1,
            total = segments.len(),
            span = %segment,
            "extracting fallback segment"
        );
        encoder
            .trim_reencode(input, &segment_file, segment.start, segment.duration_secs())
            .await?;
        segment_files.push(segment_file);
    }

    encoder.concat_demux(&segment_files, output).await
}

/// FFmpeg-backed encoder.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    encode_timeout: Duration,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    /// Create an encoder with the default timeouts.
    pub fn new() -> Self {
        Self {
            encode_timeout: Duration::from_secs(ENCODE_TIMEOUT_SECS),
        }
    }

    /// Override the encode timeout.
    pub fn with_encode_timeout(mut self, timeout: Duration) -> Self {
        self.encode_timeout = timeout;
        self
    }

    /// Re-encode settings shared by the trim and concat paths.
    fn reencode_args() -> [&'static str; 10] {
        [
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-preset",
            "fast",
            "-crf",
            "23",
            "-avoid_negative_ts",
            "make_zero",
        ]
    }

    async fn run_encode(&self, cmd: MediaCommand, what: &str) -> MediaResult<()> {
        let output = cmd.timeout(self.encode_timeout).run().await?;
        if output.success {
            Ok(())
        } else {
            Err(MediaError::encode_failed(
                format!("{what}: ffmpeg exited with code {:?}", output.exit_code),
                output.stderr_tail(),
                output.exit_code,
            ))
        }
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn copy_whole(&self, input: &Path, output: &Path) -> MediaResult<()> {
        check_ffmpeg()?;
        let cmd = MediaCommand::ffmpeg()
            .args(["-v", "error", "-i"])
            .arg(input.to_string_lossy())
            .args(["-c", "copy", "-y"])
            .arg(output.to_string_lossy());
        self.run_encode(cmd, "stream copy").await
    }

    async fn trim_reencode(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> MediaResult<()> {
        check_ffmpeg()?;
        let cmd = MediaCommand::ffmpeg()
            .args(["-v", "error", "-i"])
            .arg(input.to_string_lossy())
            .arg("-ss")
            .arg(format!("{:.3}", start_secs))
            .arg("-t")
            .arg(format!("{:.3}", duration_secs))
            .args(Self::reencode_args())
            .arg("-y")
            .arg(output.to_string_lossy());
        self.run_encode(cmd, "trim").await
    }

    async fn concat_filter_graph(
        &self,
        input: &Path,
        output: &Path,
        segments: &[TimeSpan],
    ) -> MediaResult<()> {
        check_ffmpeg()?;
        let mut cmd = MediaCommand::ffmpeg().args(["-v", "error"]);
        for segment in segments {
            cmd = cmd
                .arg("-ss")
                .arg(format!("{:.3}", segment.start))
                .arg("-t")
                .arg(format!("{:.3}", segment.duration_secs()))
                .arg("-i")
                .arg(input.to_string_lossy());
        }
        cmd = cmd
            .arg("-filter_complex")
            .arg(build_concat_filter(segments.len()))
            .args(["-map", "[outv]", "-map", "[outa]"])
            .args(Self::reencode_args())
            .arg("-y")
            .arg(output.to_string_lossy());
        self.run_encode(cmd, "filter-graph concat").await
    }

    async fn concat_demux(&self, segment_files: &[PathBuf], output: &Path) -> MediaResult<()> {
        check_ffmpeg()?;
        let first = segment_files.first().ok_or_else(|| {
            MediaError::InvalidMedia("concat demux needs at least one segment".to_string())
        })?;
        let list_dir = first.parent().ok_or_else(|| {
            MediaError::InvalidMedia("segment file has no parent directory".to_string())
        })?;

        let list_path = list_dir.join("concat_list.txt");
        let list_content = build_concat_list(segment_files);
        tokio::fs::write(&list_path, list_content).await?;

        let cmd = MediaCommand::ffmpeg()
            .args(["-v", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(list_path.to_string_lossy())
            .args(["-c", "copy", "-y"])
            .arg(output.to_string_lossy());
        self.run_encode(cmd, "demux concat").await
    }
}

/// Build the filter expression concatenating `n` video+audio input pairs.
fn build_concat_filter(n: usize) -> String {
    let mut filter = String::new();
    for i in 0..n {
        filter.push_str(&format!("[{i}:v][{i}:a]"));
    }
    filter.push_str(&format!("concat=n={n}:v=1:a=1[outv][outa]"));
    filter
}

/// Build a concat-demuxer list file body referencing the segment files.
fn build_concat_list(segment_files: &[PathBuf]) -> String {
    segment_files
        .iter()
        .map(|path| format!("file '{}'\n", path.display()))
        .collect()
}
