//! Reconciliation configuration.
//!
//! Loaded from a JSON file at startup and passed into the engine as an
//! explicit value; there is no global configuration state, so several runs
//! with different leagues or screenshot layouts can coexist in one process.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A rectangle in absolute pixel coordinates, hand-configured per screenshot
/// layout for the row-crop fallback.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything the reconciliation engine consumes, static for one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreboardConfig {
    /// Statistic column names, in table order.
    #[serde(default = "default_stat_fields")]
    pub stat_fields: Vec<String>,
    /// Per-event point values, aligned with `stat_fields`, for the score
    /// checksum.
    #[serde(default = "default_score_weights")]
    pub score_weights: Vec<u32>,
    /// Expected player names, used only to repair noisy OCR names.
    #[serde(default)]
    pub roster: Vec<String>,
    /// Exact misread-string to canonical-name corrections, consulted before
    /// fuzzy matching.
    #[serde(default)]
    pub name_corrections: HashMap<String, String>,
    /// Rows containing any of these (case-insensitive) are section labels or
    /// UI chrome, not player rows.
    #[serde(default = "default_noise_keywords")]
    pub noise_keywords: Vec<String>,
    /// Team section markers; rows containing one start a new team block.
    #[serde(default = "default_section_markers")]
    pub section_markers: Vec<String>,
    /// Vertical pixel tolerance for grouping detections into rows.
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: i64,
    /// Minimum matched labels for a row to count as the header.
    #[serde(default = "default_min_header_matches")]
    pub min_header_matches: usize,
    /// Minimum resolved fields (of name + stats + score) to keep a row.
    #[serde(default = "default_min_resolved_fields")]
    pub min_resolved_fields: usize,
    /// Minimum digit-valued stat fields across all primary rows before the
    /// selector falls back. Defaults to one per roster entry.
    #[serde(default)]
    pub min_numeric_stats: Option<usize>,
    /// Binarization thresholds, one full-table OCR pass per entry.
    #[serde(default = "default_ocr_thresholds")]
    pub ocr_thresholds: Vec<u8>,
    /// Pixel rectangles of the player rows, for the row-crop fallback.
    #[serde(default)]
    pub row_regions: Vec<PixelRect>,
    /// Output CSV path.
    #[serde(default = "default_csv_output")]
    pub csv_output: String,
}

fn default_stat_fields() -> Vec<String> {
    ["Goal", "Assist", "Pass", "Interception", "Save"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_score_weights() -> Vec<u32> {
    vec![1000, 500, 250, 250, 500]
}

fn default_noise_keywords() -> Vec<String> {
    ["total", "match", "victory", "progression", "ranking", "back"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_section_markers() -> Vec<String> {
    vec!["home".to_string(), "away".to_string()]
}

fn default_row_tolerance() -> i64 {
    28
}

fn default_min_header_matches() -> usize {
    3
}

fn default_min_resolved_fields() -> usize {
    5
}

fn default_ocr_thresholds() -> Vec<u8> {
    // Clean screenshots read well at 190; a second, looser pass at 160
    // picks up compressed or dimmer frames and feeds the consensus vote.
    vec![190, 160]
}

fn default_csv_output() -> String {
    "parsed_scoreboard.csv".to_string()
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            stat_fields: default_stat_fields(),
            score_weights: default_score_weights(),
            roster: Vec::new(),
            name_corrections: HashMap::new(),
            noise_keywords: default_noise_keywords(),
            section_markers: default_section_markers(),
            row_tolerance: default_row_tolerance(),
            min_header_matches: default_min_header_matches(),
            min_resolved_fields: default_min_resolved_fields(),
            min_numeric_stats: None,
            ocr_thresholds: default_ocr_thresholds(),
            row_regions: Vec::new(),
            csv_output: default_csv_output(),
        }
    }
}

impl ScoreboardConfig {
    /// Labels the header locator searches for: the stat fields plus Score.
    /// "Name" is never an explicit label in header text.
    pub fn header_labels(&self) -> Vec<String> {
        let mut labels = self.stat_fields.clone();
        labels.push("Score".to_string());
        labels
    }

    /// Numeric-stat minimum for the strategy selector: at least one valid
    /// stat per expected player, never less than one.
    pub fn min_numeric_stats(&self) -> usize {
        self.min_numeric_stats.unwrap_or_else(|| self.roster.len().max(1))
    }
}

/// Loads configuration from a JSON file, falling back to defaults with a
/// logged warning on any failure.
pub fn load_config(path: &Path) -> ScoreboardConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log(&format!("Config loaded from {}", path.display()));
                    return config;
                }
                Err(e) => {
                    crate::log(&format!("Failed to parse config: {}. Using defaults.", e));
                }
            },
            Err(e) => {
                crate::log(&format!("Failed to read config: {}. Using defaults.", e));
            }
        }
    } else {
        crate::log("Config file not found. Using default config.");
    }

    ScoreboardConfig::default()
}
