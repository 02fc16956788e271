//! Bounded batch fan-out over independent videos.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use vcut_media::{process_video, Encoder, FfmpegEncoder};
use vcut_models::VideoOutcome;

use crate::config::WorkerConfig;
use crate::discover::find_video_files;

/// Runs the engine over every video in a directory.
///
/// Each video gets its own pipeline instance; workers share only the
/// append-only outcome collection. A failing video never aborts its
/// siblings.
pub struct BatchProcessor {
    config: WorkerConfig,
    encoder: Arc<dyn Encoder>,
}

impl BatchProcessor {
    /// Create a processor backed by the ffmpeg encoder.
    pub fn new(config: WorkerConfig) -> Self {
        Self::with_encoder(config, Arc::new(FfmpegEncoder::new()))
    }

    /// Create a processor with an explicit encoder (used by tests).
    pub fn with_encoder(config: WorkerConfig, encoder: Arc<dyn Encoder>) -> Self {
        Self { config, encoder }
    }

    /// Process every video under `input_dir`, writing next to-be-mirrored
    /// outputs under `output_dir`. Returns one outcome per discovered video.
    pub async fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> anyhow::Result<Vec<VideoOutcome>> {
        let videos = find_video_files(input_dir, self.config.recursive)
            .with_context(|| format!("scanning {}", input_dir.display()))?;

        if videos.is_empty() {
            warn!(input_dir = %input_dir.display(), "no video files found");
            return Ok(Vec::new());
        }

        info!(
            count = videos.len(),
            max_concurrent = self.config.max_concurrent,
            recursive = self.config.recursive,
            "starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let outcomes = Arc::new(Mutex::new(Vec::with_capacity(videos.len())));
        let mut tasks = JoinSet::new();

        for video in videos {
            let output = self
                .output_path_for(&video, input_dir, output_dir)
                .with_context(|| format!("deriving output path for {}", video.display()))?;

            let semaphore = Arc::clone(&semaphore);
            let outcomes = Arc::clone(&outcomes);
            let encoder = Arc::clone(&self.encoder);
            let processing = self.config.processing.clone();

            tasks.spawn(async move {
                // Closed only on runtime shutdown; treat as a skipped video
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };

                let outcome = match prepare_output_dir(&output).await {
                    Ok(()) => process_video(encoder.as_ref(), &video, &output, &processing).await,
                    Err(err) => VideoOutcome::failed(&video, &output, err.to_string(), 0.0),
                };

                outcomes.lock().await.push(outcome);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "batch task panicked or was cancelled");
            }
        }

        let mut outcomes = Arc::try_unwrap(outcomes)
            .map_err(|_| anyhow::anyhow!("outcome collection still shared"))?
            .into_inner();
        // Deterministic report order regardless of completion order
        outcomes.sort_by(|a, b| a.input_path.cmp(&b.input_path));
        Ok(outcomes)
    }

    /// Derive the output file path, mirroring the input tree when recursive.
    fn output_path_for(
        &self,
        video: &Path,
        input_dir: &Path,
        output_dir: &Path,
    ) -> anyhow::Result<PathBuf> {
        let file_name = filtered_output_name(video)
            .ok_or_else(|| anyhow::anyhow!("video path has no file name: {}", video.display()))?;

        let parent = if self.config.recursive {
            let relative = video
                .strip_prefix(input_dir)
                .with_context(|| format!("{} is outside the input dir", video.display()))?;
            match relative.parent() {
                Some(rel_parent) => output_dir.join(rel_parent),
                None => output_dir.to_path_buf(),
            }
        } else {
            output_dir.to_path_buf()
        };

        Ok(parent.join(file_name))
    }
}

/// `clip.mp4` becomes `clip_filtered.mp4`.
pub fn filtered_output_name(video: &Path) -> Option<String> {
    let stem = video.file_stem()?.to_string_lossy();
    let extension = video.extension()?.to_string_lossy();
    Some(format!("{stem}_filtered.{extension}"))
}

async fn prepare_output_dir(output: &Path) -> std::io::Result<()> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
