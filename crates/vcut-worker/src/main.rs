//! Batch silence-trimming worker binary.
//!
//! Usage: `vcut-worker <input_dir> <output_dir>`; everything else comes from
//! the environment (see [`vcut_worker::WorkerConfig::from_env`]).

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcut_worker::{BatchProcessor, BatchReport, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vcut=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <input_dir> <output_dir>", args[0]);
        std::process::exit(2);
    }
    let input_dir = PathBuf::from(&args[1]);
    let output_dir = PathBuf::from(&args[2]);

    if !input_dir.is_dir() {
        error!(input_dir = %input_dir.display(), "input directory does not exist");
        std::process::exit(1);
    }

    // Fail fast when the toolchain is missing
    if let Err(e) = vcut_media::check_ffmpeg() {
        error!("{e}");
        std::process::exit(1);
    }
    if let Err(e) = vcut_media::check_ffprobe() {
        error!("{e}");
        std::process::exit(1);
    }

    let config = WorkerConfig::from_env();
    info!(?config, "starting vcut-worker");

    let report_path = config
        .report_path
        .clone()
        .unwrap_or_else(|| output_dir.join("batch_report.json"));

    let processor = BatchProcessor::new(config);
    let outcomes = match processor.run(&input_dir, &output_dir).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            error!(error = %e, "batch run failed");
            std::process::exit(1);
        }
    };

    let report = BatchReport::from_outcomes(outcomes);
    report.log_summary();
    if let Err(e) = report.write_json(&report_path).await {
        error!(error = %e, "failed to write report");
        std::process::exit(1);
    }

    if !report.all_succeeded() {
        std::process::exit(1);
    }
}
