//! Scoreboard OCR reconciliation tool.
//!
//! Reads a game-scoreboard screenshot, runs Tesseract over it, and
//! reconciles the noisy readings into one structured player-statistics
//! table, written as CSV and printed to the console.

mod config;
mod ocr;
mod paths;
mod reconcile;
mod report;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("scoreboard_ocr.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    paths::ensure_directories()?;

    let (image_path, config_path) = parse_args()?;
    let cfg = config::load_config(&config_path);

    log(&format!("Loading screenshot: {}", image_path.display()));
    let img = image::open(&image_path)
        .with_context(|| format!("Failed to open {}", image_path.display()))?
        .to_rgba8();

    let passes = ocr::scan_table(&img, &cfg)?;
    let mut row_source = ocr::CroppedRows {
        image: &img,
        config: &cfg,
    };

    let result = reconcile::reconcile(&passes, &mut row_source, &cfg)?;

    report::print_table(&result.rows, &cfg);
    report::print_summary(&result, &cfg);

    let csv_path = PathBuf::from(&cfg.csv_output);
    report::write_csv(&csv_path, &result.rows, &cfg)?;
    log(&format!("CSV output written as '{}'", csv_path.display()));

    Ok(())
}

fn parse_args() -> Result<(PathBuf, PathBuf)> {
    let mut image = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a path"))?;
                config = Some(PathBuf::from(path));
            }
            _ => image = Some(PathBuf::from(arg)),
        }
    }

    let image = image.ok_or_else(|| {
        anyhow!("Usage: scoreboard-ocr <screenshot.png> [--config config.json]")
    })?;
    Ok((image, config.unwrap_or_else(|| PathBuf::from("config.json"))))
}
