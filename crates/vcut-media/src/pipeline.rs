//! Per-video processing pipeline.
//!
//! Probe, extract, profile, detect, plan, render. Each stage blocks on the
//! previous one; the only side effects are the encoder invocations. The
//! pipeline holds no cross-video state and is safe to run concurrently on
//! disjoint inputs.

use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{error, info};

use vcut_models::{format_seconds, ProcessingConfig, RenderPlan, TimeSpan, VideoOutcome};

use crate::analysis::{build_volume_profile, plan_keep_intervals, SilenceDetector};
use crate::error::{MediaError, MediaResult};
use crate::extract::extract_samples;
use crate::probe::probe_media;
use crate::render::{execute_plan, select_render_plan, Encoder};

/// Process one video end to end, producing a structured outcome.
///
/// Failures abort this video only and come back as a failed outcome; they
/// never panic or poison sibling work.
pub async fn process_video(
    encoder: &dyn Encoder,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> VideoOutcome {
    let input = input.as_ref();
    let output = output.as_ref();
    let started = Instant::now();

    match run_stages(encoder, input, output, config).await {
        Ok(stages) => {
            let elapsed = started.elapsed().as_secs_f64();
            counter!("vcut_videos_processed_total", "outcome" => "success").increment(1);
            histogram!("vcut_processing_duration_seconds").record(elapsed);
            info!(
                input = %input.display(),
                output = %output.display(),
                strategy = stages.plan.kind(),
                elapsed_secs = format!("{elapsed:.1}"),
                "video processed"
            );
            VideoOutcome::succeeded(
                input,
                output,
                stages.silence_intervals,
                stages.keep_intervals,
                elapsed,
            )
        }
        Err(err) => {
            let elapsed = started.elapsed().as_secs_f64();
            counter!("vcut_videos_processed_total", "outcome" => "failure").increment(1);
            error!(
                input = %input.display(),
                error = %err,
                "video processing failed"
            );
            VideoOutcome::failed(input, output, err.to_string(), elapsed)
        }
    }
}

struct StageResults {
    silence_intervals: Vec<TimeSpan>,
    keep_intervals: Vec<TimeSpan>,
    plan: RenderPlan,
}

async fn run_stages(
    encoder: &dyn Encoder,
    input: &Path,
    output: &Path,
    config: &ProcessingConfig,
) -> MediaResult<StageResults> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    config
        .validate()
        .map_err(|e| MediaError::InvalidMedia(e.to_string()))?;

    let info = probe_media(input).await?;
    if info.duration_secs <= 0.0 {
        return Err(MediaError::InvalidMedia(
            "container reports zero duration".to_string(),
        ));
    }
    info!(
        input = %input.display(),
        duration = %format_seconds(info.duration_secs),
        video_codec = info.video_codec.as_deref().unwrap_or("none"),
        audio_codec = info.audio_codec.as_deref().unwrap_or("none"),
        sample_rate = info.sample_rate.unwrap_or(0),
        "probed input"
    );

    let buffer = extract_samples(input, 0.0, None).await?;
    let profile = build_volume_profile(&buffer);

    if let Some(stats) = DbStats::of(&profile) {
        info!(
            windows = profile.len(),
            max_db = format!("{:.2}", stats.max),
            min_db = format!("{:.2}", stats.min),
            mean_db = format!("{:.2}", stats.mean),
            "volume profile built"
        );
    } else {
        info!("audio too short to profile, treating as no silence");
    }

    let detector = SilenceDetector::new(config.silence_threshold_db, config.min_silence_secs);
    let silence_intervals = detector.detect(&profile, buffer.duration_secs());
    info!(
        silences = silence_intervals.len(),
        total_silence = %format_seconds(
            silence_intervals.iter().map(TimeSpan::duration_secs).sum()
        ),
        "silence detection complete"
    );

    let keep_intervals = plan_keep_intervals(&silence_intervals, config, info.duration_secs);
    let plan = select_render_plan(&keep_intervals, info.duration_secs)?;

    execute_plan(encoder, input, output, &plan).await?;

    Ok(StageResults {
        silence_intervals,
        keep_intervals,
        plan,
    })
}

/// Min/max/mean over a profile's dB values.
struct DbStats {
    min: f64,
    max: f64,
    mean: f64,
}

impl DbStats {
    fn of(profile: &[crate::analysis::VolumePoint]) -> Option<Self> {
        if profile.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for point in profile {
            min = min.min(point.db);
            max = max.max(point.db);
            sum += point.db;
        }
        Some(Self {
            min,
            max,
            mean: sum / profile.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::VolumePoint;

    #[test]
    fn db_stats() {
        let profile = vec![
            VolumePoint { time_secs: 0.0, db: -10.0 },
            VolumePoint { time_secs: 0.05, db: -30.0 },
            VolumePoint { time_secs: 0.10, db: -20.0 },
        ];
        let stats = DbStats::of(&profile).unwrap();
        assert_eq!(stats.min, -30.0);
        assert_eq!(stats.max, -10.0);
        assert!((stats.mean - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn db_stats_empty() {
        assert!(DbStats::of(&[]).is_none());
    }

    #[tokio::test]
    async fn missing_input_fails_cleanly() {
        struct NeverEncoder;
        #[async_trait::async_trait]
        impl Encoder for NeverEncoder {
            async fn copy_whole(&self, _: &Path, _: &Path) -> MediaResult<()> {
                panic!("encoder must not run for a missing input");
            }
            async fn trim_reencode(
                &self,
                _: &Path,
                _: &Path,
                _: f64,
                _: f64,
            ) -> MediaResult<()> {
                panic!("encoder must not run for a missing input");
            }
            async fn concat_filter_graph(
                &self,
                _: &Path,
                _: &Path,
                _: &[TimeSpan],
            ) -> MediaResult<()> {
                panic!("encoder must not run for a missing input");
            }
            async fn concat_demux(
                &self,
                _: &[std::path::PathBuf],
                _: &Path,
            ) -> MediaResult<()> {
                panic!("encoder must not run for a missing input");
            }
        }

        let outcome = process_video(
            &NeverEncoder,
            "/nonexistent/input.mp4",
            "/tmp/out.mp4",
            &ProcessingConfig::default(),
        )
        .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("file not found"));
    }

    #[tokio::test]
    async fn invalid_config_fails_cleanly() {
        struct NoopEncoder;
        #[async_trait::async_trait]
        impl Encoder for NoopEncoder {
            async fn copy_whole(&self, _: &Path, _: &Path) -> MediaResult<()> {
                Ok(())
            }
            async fn trim_reencode(
                &self,
                _: &Path,
                _: &Path,
                _: f64,
                _: f64,
            ) -> MediaResult<()> {
                Ok(())
            }
            async fn concat_filter_graph(
                &self,
                _: &Path,
                _: &Path,
                _: &[TimeSpan],
            ) -> MediaResult<()> {
                Ok(())
            }
            async fn concat_demux(
                &self,
                _: &[std::path::PathBuf],
                _: &Path,
            ) -> MediaResult<()> {
                Ok(())
            }
        }

        let temp = tempfile::NamedTempFile::new().unwrap();
        let config = ProcessingConfig::default().with_before_padding_secs(-1.0);
        let outcome = process_video(&NoopEncoder, temp.path(), "/tmp/out.mp4", &config).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains(">= 0"));
    }
}
