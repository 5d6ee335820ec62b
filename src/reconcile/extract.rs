//! Walks grouped rows and emits per-field candidate sets for each player.
//!
//! Covers the primary (header-mapped or positional) table extraction, the
//! team-section split, the purely positional fallback parse for row-cropped
//! OCR text, and the merge of candidate rows across independent OCR passes.

use std::collections::HashMap;

use super::header::{self, HeaderLocation};
use super::names;
use super::types::{CandidateRow, CandidateSet, Checksum, ColumnMap, PlayerRow, Row};
use crate::config::ScoreboardConfig;

/// One team block of grouped rows. `team` is None when no section markers
/// were found and the whole table is treated as a single block.
#[derive(Debug, Clone)]
pub struct Section {
    pub team: Option<String>,
    pub rows: Vec<Row>,
}

/// Partitions grouped rows at rows containing a configured section marker
/// (e.g. "home"/"away", matched case-insensitively anywhere in the row).
/// Each section spans from just after its marker row to the next marker.
/// Missing markers are a warning, never an error: the whole table becomes
/// one unlabeled section.
pub fn split_sections(rows: &[Row], markers: &[String]) -> Vec<Section> {
    let mut cuts: Vec<(usize, String)> = Vec::new();
    for marker in markers {
        let lower = marker.to_lowercase();
        if let Some(idx) = rows.iter().position(|row| row.joined_lower().contains(&lower)) {
            // A scoreline like "HOME 3 - 1 AWAY" contains every marker at
            // once; that row separates nothing, so the labels are ambiguous.
            if cuts.iter().any(|(seen, _)| *seen == idx) {
                crate::log("[WARN] Team section markers share one row; parsing as one table");
                return vec![Section {
                    team: None,
                    rows: rows.to_vec(),
                }];
            }
            cuts.push((idx, marker.to_uppercase()));
        }
    }

    if cuts.is_empty() {
        if !markers.is_empty() {
            crate::log("[WARN] No team section markers found; parsing as one table");
        }
        return vec![Section {
            team: None,
            rows: rows.to_vec(),
        }];
    }

    if cuts.len() < markers.len() {
        crate::log(&format!(
            "[WARN] Found {} of {} team section markers",
            cuts.len(),
            markers.len()
        ));
    }

    cuts.sort_by_key(|(idx, _)| *idx);

    let mut sections = Vec::with_capacity(cuts.len());
    for (i, (idx, team)) in cuts.iter().enumerate() {
        let end = cuts.get(i + 1).map(|(next, _)| *next).unwrap_or(rows.len());
        sections.push(Section {
            team: Some(team.clone()),
            rows: rows[idx + 1..end].to_vec(),
        });
    }
    sections
}

/// Extracts candidate rows from one section of one OCR pass.
///
/// Locates the section's header row to map columns; if no header clears the
/// threshold, parsing continues from the top of the section with purely
/// positional rules.
pub fn extract_section(section: &Section, cfg: &ScoreboardConfig) -> Vec<CandidateRow> {
    let labels = cfg.header_labels();
    let header = header::locate_header(&section.rows, &labels, cfg.min_header_matches);

    let start = match &header {
        Some(HeaderLocation { row_index, .. }) => row_index + 1,
        None => {
            crate::log("[WARN] Stat header row not found; parsing rows positionally");
            0
        }
    };
    let columns = header.map(|loc| loc.columns);

    let mut out = Vec::new();
    for row in &section.rows[start..] {
        if let Some(mut candidate) = extract_row(row, columns.as_ref(), cfg) {
            candidate.team = section.team.clone();
            out.push(candidate);
        }
    }
    out
}

/// Parses one grouped row into per-field candidate sets. Returns None for
/// rows that are noise (too few cells, stop-list hits, no identifiable
/// name), which is a silent discard by design.
fn extract_row(
    row: &Row,
    columns: Option<&ColumnMap>,
    cfg: &ScoreboardConfig,
) -> Option<CandidateRow> {
    let mut cells: Vec<String> = row
        .cells
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if cells.len() < 2 {
        return None;
    }

    // Section labels and UI chrome, not player rows.
    let noisy = cells.iter().any(|cell| {
        let lower = cell.to_lowercase();
        cfg.noise_keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
    });
    if noisy {
        return None;
    }

    let mut is_mvp = false;
    if cells.last().is_some_and(|c| c.eq_ignore_ascii_case("mvp")) {
        is_mvp = true;
        cells.pop();
    }

    let labels = cfg.header_labels();
    let name = match columns {
        // Header-mapped: the name is the first cell that is neither purely
        // numeric nor itself a column label.
        Some(_) => cells
            .iter()
            .find(|cell| !is_numeric_cell(cell) && !is_label(cell, &labels))
            .cloned()?,
        None => cells.first().cloned()?,
    };

    let mut stats = Vec::with_capacity(cfg.stat_fields.len());
    match columns {
        Some(map) => {
            for field in &cfg.stat_fields {
                let value = map
                    .get(field)
                    .and_then(|i| cells.get(i))
                    .map(|c| c.replace(',', ""))
                    .unwrap_or_else(|| "0".to_string());
                stats.push(CandidateSet::single(value));
            }
        }
        None => {
            // Positional: first cell is the name, then stat slots in declared
            // order, padded with zero for missing trailing cells.
            for i in 0..cfg.stat_fields.len() {
                let value = cells
                    .get(i + 1)
                    .map(|c| c.replace(',', ""))
                    .unwrap_or_else(|| "0".to_string());
                stats.push(CandidateSet::single(value));
            }
        }
    }

    // The score column is visually rightmost and the most prone to column
    // drift, so it is anchored positionally rather than by header mapping.
    let score = cells.last().map(|c| c.replace(',', ""))?;

    Some(CandidateRow {
        team: None,
        name: CandidateSet::single(name),
        stats,
        score: CandidateSet::single(score),
        is_mvp,
    })
}

fn is_numeric_cell(cell: &str) -> bool {
    let stripped = cell.replace(',', "");
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

fn is_label(cell: &str, labels: &[String]) -> bool {
    let lower = cell.to_lowercase();
    labels.iter().any(|l| l.to_lowercase() == lower)
}

/// Positional parse of one row-cropped OCR line (FALLBACK strategy). Commas
/// are stripped, a trailing MVP token is peeled off, and the remaining
/// tokens fill [name, stats.., score] with zero-padding and truncation.
/// Fallback rows are accepted as-is, with no acceptance filtering.
pub fn parse_row_text(text: &str, cfg: &ScoreboardConfig) -> PlayerRow {
    let cleaned = text.replace(',', "");
    let mut values: Vec<String> = cleaned.split_whitespace().map(String::from).collect();

    let mut is_mvp = false;
    if values.last().is_some_and(|v| v.eq_ignore_ascii_case("mvp")) {
        is_mvp = true;
        values.pop();
    }

    let width = cfg.stat_fields.len() + 2; // name + stats + score
    while values.len() < width {
        values.push("0".to_string());
    }
    values.truncate(width);

    let name = names::fix_name(&values[0], &cfg.name_corrections, &cfg.roster);
    PlayerRow {
        team: None,
        name,
        stats: values[1..width - 1].to_vec(),
        score: values[width - 1].clone(),
        is_mvp,
        checksum: Checksum::Undetermined,
    }
}

/// Merges candidate rows from independent OCR passes over the same
/// screenshot. Rows are aligned by (team, ordinal within team): passes see
/// the same physical table, so row order is stable and each aligned field
/// accumulates one reading per pass into its candidate set.
///
/// When one pass found team markers and another did not (a lower
/// binarization threshold can mangle the marker text), team-keyed alignment
/// would file the same physical row twice. Those runs align by bare table
/// order instead, and the labeled pass's team names win.
pub fn merge_passes(passes: Vec<Vec<CandidateRow>>) -> Vec<CandidateRow> {
    let by_ordinal_only = section_labels_diverge(&passes);
    if by_ordinal_only {
        crate::log("[WARN] OCR passes disagree on team sections; aligning rows by table order");
    }

    let mut merged: Vec<CandidateRow> = Vec::new();
    for pass in passes {
        let mut ordinals: HashMap<Option<String>, usize> = HashMap::new();
        for row in pass {
            let key = if by_ordinal_only { None } else { row.team.clone() };
            let ordinal = ordinals.entry(key).or_insert(0);
            let slot = if by_ordinal_only {
                merged.get_mut(*ordinal)
            } else {
                merged
                    .iter_mut()
                    .filter(|m| m.team == row.team)
                    .nth(*ordinal)
            };
            match slot {
                Some(existing) => {
                    if existing.team.is_none() {
                        existing.team = row.team.clone();
                    }
                    existing.absorb(&row);
                }
                None => merged.push(row),
            }
            *ordinal += 1;
        }
    }

    merged
}

/// True when one non-empty pass carries team labels and another carries
/// none. A pass that merely missed part of one team still agrees.
fn section_labels_diverge(passes: &[Vec<CandidateRow>]) -> bool {
    let mut any_labeled = false;
    let mut any_unlabeled = false;
    for pass in passes.iter().filter(|p| !p.is_empty()) {
        if pass.iter().any(|r| r.team.is_some()) {
            any_labeled = true;
        } else {
            any_unlabeled = true;
        }
    }
    any_labeled && any_unlabeled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreboardConfig;

    fn make_row(cells: &[&str]) -> Row {
        Row::new(cells.iter().map(|s| s.to_string()).collect())
    }

    fn column_map() -> ColumnMap {
        // Name | Goal | Assist | Pass | Interception | Save | Score
        let mut map = ColumnMap::default();
        for (i, label) in ["goal", "assist", "pass", "interception", "save", "score"]
            .iter()
            .enumerate()
        {
            map.insert(label, i + 1);
        }
        map
    }

    fn first_values(row: &CandidateRow) -> (String, Vec<String>, String) {
        (
            row.name.values()[0].clone(),
            row.stats.iter().map(|s| s.values()[0].clone()).collect(),
            row.score.values()[0].clone(),
        )
    }

    #[test]
    fn test_extract_row_with_column_map() {
        let cfg = ScoreboardConfig::default();
        let row = make_row(&["kurank", "4", "0", "5", "4", "2", "3,840"]);
        let parsed = extract_row(&row, Some(&column_map()), &cfg).unwrap();
        let (name, stats, score) = first_values(&parsed);
        assert_eq!(name, "kurank");
        assert_eq!(stats, vec!["4", "0", "5", "4", "2"]);
        assert_eq!(score, "3840");
        assert!(!parsed.is_mvp);
    }

    #[test]
    fn test_mvp_cell_stripped_and_flagged() {
        let cfg = ScoreboardConfig::default();
        let row = make_row(&["rengoku", "9", "3", "7", "5", "13", "20000", "MVP"]);
        let parsed = extract_row(&row, Some(&column_map()), &cfg).unwrap();
        assert!(parsed.is_mvp);
        assert_eq!(parsed.score.values()[0], "20000");
    }

    #[test]
    fn test_noise_rows_discarded() {
        let cfg = ScoreboardConfig::default();
        for cells in [
            &["Total", "12", "3"][..],
            &["Match", "Victory"][..],
            &["Back", "to", "Ranking"][..],
        ] {
            assert!(extract_row(&make_row(cells), Some(&column_map()), &cfg).is_none());
        }
    }

    #[test]
    fn test_short_rows_discarded() {
        let cfg = ScoreboardConfig::default();
        assert!(extract_row(&make_row(&["kurank"]), None, &cfg).is_none());
        assert!(extract_row(&make_row(&["", " "]), None, &cfg).is_none());
    }

    #[test]
    fn test_name_skips_numeric_and_label_cells() {
        let cfg = ScoreboardConfig::default();
        // A stray column-drift digit lands before the name.
        let row = make_row(&["9", "ByRia", "0", "2", "4", "0", "2060"]);
        let parsed = extract_row(&row, Some(&column_map()), &cfg).unwrap();
        assert_eq!(parsed.name.values()[0], "ByRia");
    }

    #[test]
    fn test_missing_mapped_cells_pad_zero() {
        let cfg = ScoreboardConfig::default();
        // Only four cells: the save/score indexes run off the end.
        let row = make_row(&["kurank", "4", "0", "5"]);
        let parsed = extract_row(&row, Some(&column_map()), &cfg).unwrap();
        let (_, stats, score) = first_values(&parsed);
        assert_eq!(stats, vec!["4", "0", "5", "0", "0"]);
        // Score stays anchored to the last cell regardless of the map.
        assert_eq!(score, "5");
    }

    #[test]
    fn test_positional_parse_without_map() {
        let cfg = ScoreboardConfig::default();
        let row = make_row(&["moRise", "0", "0", "5", "3", "5", "2780"]);
        let parsed = extract_row(&row, None, &cfg).unwrap();
        let (name, stats, score) = first_values(&parsed);
        assert_eq!(name, "moRise");
        assert_eq!(stats, vec!["0", "0", "5", "3", "5"]);
        assert_eq!(score, "2780");
    }

    #[test]
    fn test_positional_parse_pads_missing_tail() {
        let cfg = ScoreboardConfig::default();
        let row = make_row(&["Asselo", "1", "750"]);
        let parsed = extract_row(&row, None, &cfg).unwrap();
        let (_, stats, score) = first_values(&parsed);
        assert_eq!(stats, vec!["1", "750", "0", "0", "0"]);
        assert_eq!(score, "750");
    }

    #[test]
    fn test_split_sections_by_markers() {
        let markers = vec!["home".to_string(), "away".to_string()];
        let rows = vec![
            make_row(&["Final", "Score"]),
            make_row(&["HOME", "3"]),
            make_row(&["kurank", "4"]),
            make_row(&["moRise", "2"]),
            make_row(&["AWAY", "1"]),
            make_row(&["rengoku", "9"]),
        ];
        let sections = split_sections(&rows, &markers);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].team.as_deref(), Some("HOME"));
        assert_eq!(sections[0].rows.len(), 2);
        assert_eq!(sections[1].team.as_deref(), Some("AWAY"));
        assert_eq!(sections[1].rows[0].cells[0], "rengoku");
    }

    #[test]
    fn test_scoreline_row_with_both_markers_is_one_section() {
        let markers = vec!["home".to_string(), "away".to_string()];
        // The scoreline row names both teams; it marks no section boundary.
        let rows = vec![
            make_row(&["HOME", "3", "-", "1", "AWAY"]),
            make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]),
        ];
        let sections = split_sections(&rows, &markers);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].team.is_none());
        assert_eq!(sections[0].rows.len(), 2);
    }

    #[test]
    fn test_split_sections_without_markers() {
        let markers = vec!["home".to_string(), "away".to_string()];
        let rows = vec![make_row(&["kurank", "4"]), make_row(&["moRise", "2"])];
        let sections = split_sections(&rows, &markers);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].team.is_none());
        assert_eq!(sections[0].rows.len(), 2);
    }

    #[test]
    fn test_extract_section_skips_header() {
        let cfg = ScoreboardConfig::default();
        let section = Section {
            team: Some("HOME".to_string()),
            rows: vec![
                make_row(&["Player", "Goal", "Assist", "Pass", "Interception", "Save", "Score"]),
                make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]),
            ],
        };
        let rows = extract_section(&section, &cfg);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team.as_deref(), Some("HOME"));
        assert_eq!(rows[0].name.values()[0], "kurank");
    }

    #[test]
    fn test_parse_row_text_positional() {
        let cfg = ScoreboardConfig::default();
        let row = parse_row_text("Kolanis 2 0 3 1 0 2,430 MVP", &cfg);
        assert_eq!(row.name, "Kolanis");
        assert_eq!(row.stats, vec!["2", "0", "3", "1", "0"]);
        assert_eq!(row.score, "2430");
        assert!(row.is_mvp);
    }

    #[test]
    fn test_parse_row_text_pads_and_truncates() {
        let cfg = ScoreboardConfig::default();
        let short = parse_row_text("Ghostly 1 800", &cfg);
        assert_eq!(short.stats, vec!["1", "800", "0", "0", "0"]);
        assert_eq!(short.score, "0");

        let long = parse_row_text("ZuL 1 2 3 4 5 6 7 8", &cfg);
        assert_eq!(long.stats, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(long.score, "6");
    }

    #[test]
    fn test_merge_passes_accumulates_candidates() {
        let cfg = ScoreboardConfig::default();
        let pass_a = vec![
            extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
                .unwrap(),
        ];
        let pass_b = vec![
            extract_row(&make_row(&["kunirk", "2", "0", "5", "4", "2", "3840"]), None, &cfg)
                .unwrap(),
        ];
        let merged = merge_passes(vec![pass_a, pass_b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name.values(), ["kurank", "kunirk"]);
        assert_eq!(merged[0].stats[0].values(), ["4", "2"]);
        assert_eq!(merged[0].score.values(), ["3840", "3840"]);
    }

    #[test]
    fn test_merge_passes_aligns_by_team() {
        let cfg = ScoreboardConfig::default();
        let mut home = extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
            .unwrap();
        home.team = Some("HOME".to_string());
        let mut away = extract_row(&make_row(&["rengoku", "9", "3", "7", "5", "13", "600"]), None, &cfg)
            .unwrap();
        away.team = Some("AWAY".to_string());

        // Second pass only re-read the away block.
        let mut away_again =
            extract_row(&make_row(&["rengoku", "9", "3", "7", "5", "13", "0600"]), None, &cfg)
                .unwrap();
        away_again.team = Some("AWAY".to_string());

        let merged = merge_passes(vec![vec![home, away], vec![away_again]]);
        assert_eq!(merged.len(), 2);
        let merged_away = merged.iter().find(|r| r.team.as_deref() == Some("AWAY")).unwrap();
        assert_eq!(merged_away.score.values(), ["600", "0600"]);
        let merged_home = merged.iter().find(|r| r.team.as_deref() == Some("HOME")).unwrap();
        assert_eq!(merged_home.name.values(), ["kurank"]);
    }

    #[test]
    fn test_merge_passes_with_unlabeled_pass_aligns_by_order() {
        let cfg = ScoreboardConfig::default();
        let mut home = extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
            .unwrap();
        home.team = Some("HOME".to_string());
        let mut away = extract_row(&make_row(&["rengoku", "9", "3", "7", "5", "13", "20000"]), None, &cfg)
            .unwrap();
        away.team = Some("AWAY".to_string());

        // Second pass read the same physical rows but missed both markers.
        let plain_a =
            extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
                .unwrap();
        let plain_b =
            extract_row(&make_row(&["rengoku", "9", "3", "7", "5", "13", "20000"]), None, &cfg)
                .unwrap();

        let merged = merge_passes(vec![vec![home, away], vec![plain_a, plain_b]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].team.as_deref(), Some("HOME"));
        assert_eq!(merged[0].name.values(), ["kurank", "kurank"]);
        assert_eq!(merged[1].team.as_deref(), Some("AWAY"));
        assert_eq!(merged[1].name.values(), ["rengoku", "rengoku"]);
    }

    #[test]
    fn test_merge_passes_labels_win_over_unlabeled_first_pass() {
        let cfg = ScoreboardConfig::default();
        let plain =
            extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
                .unwrap();
        let mut labeled =
            extract_row(&make_row(&["kurank", "4", "0", "5", "4", "2", "3840"]), None, &cfg)
                .unwrap();
        labeled.team = Some("HOME".to_string());

        let merged = merge_passes(vec![vec![plain], vec![labeled]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].team.as_deref(), Some("HOME"));
        assert_eq!(merged[0].name.values(), ["kurank", "kurank"]);
    }
}
