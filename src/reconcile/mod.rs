//! OCR table reconciliation engine.
//!
//! Takes raw OCR detections from one or more passes over a scoreboard
//! screenshot and reduces them to one structured player table: rows are
//! grouped by vertical position, the header row establishes column
//! semantics, per-field candidates are resolved by consensus voting, names
//! are repaired against the roster, and an arithmetic checksum annotates
//! each row. A strategy selector falls back to independent row-cropped
//! extraction when the full-table pass yields too little numeric signal.

pub mod checksum;
pub mod consensus;
pub mod extract;
pub mod grouper;
pub mod header;
pub mod names;
pub mod types;

pub use types::{
    BoundingBox, CandidateRow, CandidateSet, Checksum, ColumnMap, Detection, PlayerRow, Row,
    Strategy,
};

use anyhow::Result;

use crate::config::ScoreboardConfig;

/// Supplies one OCR'd text line per configured row region. Only invoked
/// when the selector moves to FALLBACK, so implementations may defer the
/// (slow) per-row OCR until then.
pub trait RowSource {
    fn read_rows(&mut self) -> Result<Vec<String>>;
}

/// Two-state extraction strategy machine. Starts in PRIMARY; moves to
/// FALLBACK when the primary result carries too little numeric signal.
/// FALLBACK is terminal: there is no transition back.
#[derive(Debug)]
pub struct StrategySelector {
    state: Strategy,
    min_numeric_stats: usize,
}

impl StrategySelector {
    pub fn new(min_numeric_stats: usize) -> Self {
        Self {
            state: Strategy::Primary,
            min_numeric_stats,
        }
    }

    pub fn state(&self) -> Strategy {
        self.state
    }

    /// Reviews a primary result: counts stat fields that resolved to digit
    /// strings across all rows and transitions to FALLBACK when the count
    /// falls below the minimum (or no rows survived at all).
    pub fn review(&mut self, rows: &[PlayerRow]) -> Strategy {
        if self.state == Strategy::Fallback {
            return Strategy::Fallback;
        }

        let numeric = rows
            .iter()
            .flat_map(|row| &row.stats)
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
            .count();

        if rows.is_empty() || numeric < self.min_numeric_stats {
            crate::log(&format!(
                "Primary pass too weak: {} numeric stat fields across {} rows (minimum {})",
                numeric,
                rows.len(),
                self.min_numeric_stats
            ));
            self.state = Strategy::Fallback;
        }
        self.state
    }
}

/// Per-run diagnostics reported alongside the resolved rows.
#[derive(Debug, Clone)]
pub struct Summary {
    pub strategy: Strategy,
    pub rows_found: usize,
    pub rows_dropped: usize,
    pub players_matched: usize,
    pub rows_fully_statted: usize,
    pub stat_fields_filled: usize,
    pub checksum_mismatches: usize,
}

/// The final structured table plus diagnostics.
#[derive(Debug)]
pub struct Reconciliation {
    pub rows: Vec<PlayerRow>,
    pub summary: Summary,
}

/// Runs the full reconciliation pipeline over the given OCR passes.
///
/// PRIMARY: each pass is grouped into rows, split into team sections, and
/// extracted via the header map (or positionally when the header is
/// absent); candidate rows are merged across passes and resolved by
/// consensus with row acceptance. If the selector finds the result too
/// weak, FALLBACK re-extracts from `row_source` with purely positional
/// parsing and accepts that output as-is.
pub fn reconcile<S: RowSource>(
    passes: &[Vec<Detection>],
    row_source: &mut S,
    cfg: &ScoreboardConfig,
) -> Result<Reconciliation> {
    let mut selector = StrategySelector::new(cfg.min_numeric_stats());

    let mut candidate_passes: Vec<Vec<CandidateRow>> = Vec::with_capacity(passes.len());
    for detections in passes {
        let rows = grouper::group_by_row(detections, cfg.row_tolerance);
        let sections = extract::split_sections(&rows, &cfg.section_markers);
        let mut pass_rows = Vec::new();
        for section in &sections {
            pass_rows.extend(extract::extract_section(section, cfg));
        }
        candidate_passes.push(pass_rows);
    }

    let merged = extract::merge_passes(candidate_passes);
    let mut rows_dropped = 0;
    let mut rows: Vec<PlayerRow> = Vec::with_capacity(merged.len());
    for candidate in &merged {
        match consensus::resolve_row(candidate, cfg) {
            Some(row) => rows.push(row),
            None => rows_dropped += 1,
        }
    }
    for row in &mut rows {
        row.checksum = checksum::verify(row, cfg);
    }

    if selector.review(&rows) == Strategy::Fallback {
        crate::log("Falling back to row-crop extraction");
        let texts = row_source.read_rows()?;
        rows = texts
            .iter()
            .map(|text| extract::parse_row_text(text, cfg))
            .collect();
        for row in &mut rows {
            row.checksum = checksum::verify(row, cfg);
        }
        rows_dropped = 0;
    }

    let summary = summarize(&rows, rows_dropped, selector.state(), cfg);
    Ok(Reconciliation { rows, summary })
}

fn summarize(
    rows: &[PlayerRow],
    rows_dropped: usize,
    strategy: Strategy,
    cfg: &ScoreboardConfig,
) -> Summary {
    let roster_lower: Vec<String> = cfg.roster.iter().map(|n| n.to_lowercase()).collect();
    let players_matched = rows
        .iter()
        .filter(|row| roster_lower.contains(&row.name.to_lowercase()))
        .count();

    let is_filled = |s: &String| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let rows_fully_statted = rows
        .iter()
        .filter(|row| row.stats.iter().all(is_filled))
        .count();
    let stat_fields_filled = rows
        .iter()
        .flat_map(|row| &row.stats)
        .filter(|s| is_filled(s))
        .count();
    let checksum_mismatches = rows
        .iter()
        .filter(|row| matches!(row.checksum, Checksum::Mismatch { .. }))
        .count();

    Summary {
        strategy,
        rows_found: rows.len(),
        rows_dropped,
        players_matched,
        rows_fully_statted,
        stat_fields_filled,
        checksum_mismatches,
    }
}
