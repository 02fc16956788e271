//! Worker configuration from the environment.

use std::path::PathBuf;

use vcut_models::{ProcessingConfig, RhythmPreset};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum videos processed concurrently.
    pub max_concurrent: usize,
    /// Whether to search input subdirectories.
    pub recursive: bool,
    /// Where to write the JSON report; defaults to the output directory.
    pub report_path: Option<PathBuf>,
    /// Analysis parameters applied to every video in the batch.
    pub processing: ProcessingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            recursive: false,
            report_path: None,
            processing: RhythmPreset::Medium.config(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// `VCUT_PRESET` picks a base preset (slow/medium/fast, default medium);
    /// the individual `VCUT_THRESHOLD_DB` / `VCUT_BEFORE_PADDING` /
    /// `VCUT_AFTER_PADDING` / `VCUT_MIN_SILENCE` variables override single
    /// fields on top of it.
    pub fn from_env() -> Self {
        let preset = std::env::var("VCUT_PRESET")
            .ok()
            .and_then(|name| RhythmPreset::from_name(&name))
            .unwrap_or(RhythmPreset::Medium);

        let mut processing = preset.config();
        if let Some(db) = env_f64("VCUT_THRESHOLD_DB") {
            processing = processing.with_threshold_db(db);
        }
        if let Some(secs) = env_f64("VCUT_BEFORE_PADDING") {
            processing = processing.with_before_padding_secs(secs);
        }
        if let Some(secs) = env_f64("VCUT_AFTER_PADDING") {
            processing = processing.with_after_padding_secs(secs);
        }
        if let Some(secs) = env_f64("VCUT_MIN_SILENCE") {
            processing = processing.with_min_silence_secs(secs);
        }

        Self {
            max_concurrent: std::env::var("VCUT_MAX_CONCURRENT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(2),
            recursive: std::env::var("VCUT_RECURSIVE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            report_path: std::env::var("VCUT_REPORT").ok().map(PathBuf::from),
            processing,
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_medium_preset() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_concurrent, 2);
        assert!(!config.recursive);
        assert!(config.report_path.is_none());
        assert_eq!(config.processing, RhythmPreset::Medium.config());
    }
}
