//! FFmpeg CLI wrapper and silence analysis engine for vcut.
//!
//! This crate provides:
//! - Probing and mono PCM extraction through the external toolchain
//! - Windowed volume profiling and silence interval detection
//! - Keep-interval planning with padding and merge semantics
//! - Render strategy selection and execution with a concat fallback
//! - A best-effort volume sampler for threshold calibration
//!
//! The engine never decodes or encodes media itself; ffmpeg/ffprobe are
//! invoked as black boxes with bounded timeouts.

pub mod analysis;
pub mod command;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod render;
pub mod sampler;

pub use analysis::{
    build_volume_profile, merge_spans, plan_keep_intervals, MajorityVoteSmoother, MaskSmoother,
    MorphologicalSmoother, SilenceDetector, VolumePoint,
};
pub use command::{check_ffmpeg, check_ffprobe};
pub use error::{MediaError, MediaResult};
pub use extract::{extract_samples, SampleBuffer, ANALYSIS_SAMPLE_RATE};
pub use pipeline::process_video;
pub use probe::{probe_media, MediaInfo};
pub use render::{execute_plan, select_render_plan, Encoder, FfmpegEncoder};
pub use sampler::{sample_volume, suggested_threshold_db, SAMPLER_FAULT_SENTINEL_DB};
