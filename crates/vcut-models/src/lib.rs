//! Shared data models for the vcut silence-trimming engine.
//!
//! Plain data types only: processing configuration and presets, time
//! intervals, render plans, and per-video outcomes. No IO happens here.

pub mod config;
pub mod interval;
pub mod outcome;
pub mod plan;
pub mod timestamp;

pub use config::{ConfigError, ProcessingConfig, RhythmPreset};
pub use interval::TimeSpan;
pub use outcome::VideoOutcome;
pub use plan::RenderPlan;
pub use timestamp::format_seconds;
