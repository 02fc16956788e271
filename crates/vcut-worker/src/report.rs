//! Batch report generation.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vcut_models::VideoOutcome;

/// Aggregate numbers for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_elapsed_secs: f64,
    pub mean_elapsed_secs: f64,
}

/// Full report: summary plus per-file details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub summary: BatchSummary,
    pub details: Vec<VideoOutcome>,
}

impl BatchReport {
    /// Build a report from per-video outcomes.
    pub fn from_outcomes(details: Vec<VideoOutcome>) -> Self {
        let total_files = details.len();
        let succeeded = details.iter().filter(|o| o.success).count();
        let total_elapsed_secs: f64 = details.iter().map(|o| o.elapsed_secs).sum();
        let mean_elapsed_secs = if total_files > 0 {
            total_elapsed_secs / total_files as f64
        } else {
            0.0
        };

        Self {
            generated_at: Utc::now(),
            summary: BatchSummary {
                total_files,
                succeeded,
                failed: total_files - succeeded,
                total_elapsed_secs,
                mean_elapsed_secs,
            },
            details,
        }
    }

    /// True when every file processed successfully.
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0
    }

    /// Log the summary, listing failed files.
    pub fn log_summary(&self) {
        info!(
            total = self.summary.total_files,
            succeeded = self.summary.succeeded,
            failed = self.summary.failed,
            total_elapsed_secs = format!("{:.1}", self.summary.total_elapsed_secs),
            mean_elapsed_secs = format!("{:.1}", self.summary.mean_elapsed_secs),
            "batch complete"
        );
        for outcome in self.details.iter().filter(|o| !o.success) {
            warn!(
                input = %outcome.input_path.display(),
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "file failed"
            );
        }
    }

    /// Write the report as pretty JSON.
    pub async fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, body).await?;
        info!(path = %path.display(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcut_models::TimeSpan;

    fn outcomes() -> Vec<VideoOutcome> {
        vec![
            VideoOutcome::succeeded(
                "a.mp4",
                "a_filtered.mp4",
                vec![TimeSpan::new(2.0, 4.0)],
                vec![TimeSpan::new(0.0, 2.2), TimeSpan::new(3.9, 11.0)],
                4.0,
            ),
            VideoOutcome::failed("b.mp4", "b_filtered.mp4", "probe failed: boom", 1.0),
        ]
    }

    #[test]
    fn summary_totals() {
        let report = BatchReport::from_outcomes(outcomes());
        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.summary.failed, 1);
        assert!((report.summary.total_elapsed_secs - 5.0).abs() < 1e-9);
        assert!((report.summary.mean_elapsed_secs - 2.5).abs() < 1e-9);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn empty_batch_summary() {
        let report = BatchReport::from_outcomes(Vec::new());
        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.mean_elapsed_secs, 0.0);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn report_round_trips_through_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports/batch_report.json");

        let report = BatchReport::from_outcomes(outcomes());
        report.write_json(&path).await.unwrap();

        let raw = std::fs::read(&path).unwrap();
        let parsed: BatchReport = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed.summary.total_files, 2);
        assert_eq!(parsed.details.len(), 2);
        assert_eq!(parsed.details[1].error.as_deref(), Some("probe failed: boom"));
    }
}
