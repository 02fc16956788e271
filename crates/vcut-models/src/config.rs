//! Processing configuration and rhythm presets.
//!
//! The four knobs control how aggressively silence is detected and cut.
//! The named presets trade pacing against the risk of clipping speech.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named pacing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhythmPreset {
    /// Gentle cuts, generous padding. Tolerates slow speakers.
    Slow,
    /// Balanced defaults for most talking-head material.
    Medium,
    /// Aggressive cuts for fast-paced output.
    Fast,
}

impl RhythmPreset {
    /// Parse a preset name as accepted on the command line / environment.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "slow" => Some(Self::Slow),
            "medium" => Some(Self::Medium),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }

    /// Canonical preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        }
    }

    /// The configuration this preset stands for.
    pub fn config(&self) -> ProcessingConfig {
        match self {
            Self::Slow => ProcessingConfig {
                silence_threshold_db: -40.0,
                before_padding_secs: 0.5,
                after_padding_secs: 0.8,
                min_silence_secs: 1.0,
            },
            Self::Medium => ProcessingConfig {
                silence_threshold_db: -35.0,
                before_padding_secs: 0.3,
                after_padding_secs: 0.5,
                min_silence_secs: 0.8,
            },
            Self::Fast => ProcessingConfig {
                silence_threshold_db: -30.0,
                before_padding_secs: 0.1,
                after_padding_secs: 0.2,
                min_silence_secs: 0.5,
            },
        }
    }
}

impl std::fmt::Display for RhythmPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for one video's silence analysis and cut planning.
///
/// All four fields are independent; the only validation is that values are
/// finite and paddings are non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Windows quieter than this are candidate silence (dB, typically negative).
    pub silence_threshold_db: f64,
    /// Seconds kept before active material resumes after a silence.
    pub before_padding_secs: f64,
    /// Seconds kept after active material stops at a silence boundary.
    pub after_padding_secs: f64,
    /// Silences shorter than this are ignored (seconds).
    pub min_silence_secs: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        RhythmPreset::Medium.config()
    }
}

impl ProcessingConfig {
    /// Builder-style setter for the silence threshold.
    pub fn with_threshold_db(mut self, db: f64) -> Self {
        self.silence_threshold_db = db;
        self
    }

    /// Builder-style setter for the before-padding.
    pub fn with_before_padding_secs(mut self, secs: f64) -> Self {
        self.before_padding_secs = secs;
        self
    }

    /// Builder-style setter for the after-padding.
    pub fn with_after_padding_secs(mut self, secs: f64) -> Self {
        self.after_padding_secs = secs;
        self
    }

    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence_secs(mut self, secs: f64) -> Self {
        self.min_silence_secs = secs;
        self
    }

    /// Check field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("silence_threshold_db", self.silence_threshold_db),
            ("before_padding_secs", self.before_padding_secs),
            ("after_padding_secs", self.after_padding_secs),
            ("min_silence_secs", self.min_silence_secs),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        if self.before_padding_secs < 0.0 {
            return Err(ConfigError::NegativePadding("before_padding_secs"));
        }
        if self.after_padding_secs < 0.0 {
            return Err(ConfigError::NegativePadding("after_padding_secs"));
        }
        Ok(())
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be finite")]
    NotFinite(&'static str),

    #[error("{0} must be >= 0")]
    NegativePadding(&'static str),
}
