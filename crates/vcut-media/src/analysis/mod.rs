//! Silence analysis: volume profiling, mask smoothing, interval detection
//! and keep-interval planning.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ SampleBuffer │───►│ VolumeProfile│───►│ Silence      │───►│ Keep-Interval│
//! │ (mono PCM)   │    │ (windowed dB)│    │ Detector     │    │ Planner      │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Every stage is pure: output depends only on its inputs, never on prior
//! calls, so the whole chain is safe to run concurrently on disjoint videos.

mod detector;
mod planner;
mod smoothing;
mod volume;

pub use detector::SilenceDetector;
pub use planner::{merge_spans, plan_keep_intervals};
pub use smoothing::{MajorityVoteSmoother, MaskSmoother, MorphologicalSmoother};
pub use volume::{build_volume_profile, VolumePoint, HOP_SECS, WINDOW_SECS};
