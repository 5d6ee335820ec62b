//! Locates the header row that names the statistic columns.

use super::types::{ColumnMap, Row};

/// A located header: which row it is and where each label sits.
#[derive(Debug, Clone)]
pub struct HeaderLocation {
    pub row_index: usize,
    pub columns: ColumnMap,
}

/// Scans every row for the configured stat labels (case-insensitive exact
/// cell matches) and keeps the row with the most hits. Returns `None` when
/// the best row matches fewer than `min_matches` labels; extraction then
/// falls back to purely positional parsing.
///
/// "Name" is never a label: the name column is identified by elimination.
pub fn locate_header(rows: &[Row], labels: &[String], min_matches: usize) -> Option<HeaderLocation> {
    let labels_lower: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();

    let mut best: Option<HeaderLocation> = None;
    let mut best_count = 0;

    for (idx, row) in rows.iter().enumerate() {
        let cells_lower: Vec<String> = row
            .cells
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        let mut columns = ColumnMap::default();
        for label in &labels_lower {
            if let Some(pos) = cells_lower.iter().position(|c| c == label) {
                columns.insert(label, pos);
            }
        }

        if columns.len() > best_count {
            best_count = columns.len();
            best = Some(HeaderLocation {
                row_index: idx,
                columns,
            });
        }
    }

    if best_count >= min_matches { best } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Goal", "Assist", "Pass", "Interception", "Save", "Score"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn make_row(cells: &[&str]) -> Row {
        Row::new(cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_locates_scrambled_header() {
        let rows = vec![
            make_row(&["HOME", "3", "-", "1", "AWAY"]),
            make_row(&["Save", "Goal", "Score", "Pass", "Assist", "Interception"]),
            make_row(&["kurank", "4", "0", "5", "4", "3840"]),
        ];
        let loc = locate_header(&rows, &labels(), 3).unwrap();
        assert_eq!(loc.row_index, 1);
        assert_eq!(loc.columns.get("save"), Some(0));
        assert_eq!(loc.columns.get("goal"), Some(1));
        assert_eq!(loc.columns.get("score"), Some(2));
        assert_eq!(loc.columns.get("pass"), Some(3));
        assert_eq!(loc.columns.get("assist"), Some(4));
        assert_eq!(loc.columns.get("interception"), Some(5));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rows = vec![make_row(&["GOAL", "assist", "PaSs", "SCORE"])];
        let loc = locate_header(&rows, &labels(), 3).unwrap();
        assert_eq!(loc.columns.len(), 4);
        assert_eq!(loc.columns.get("Goal"), Some(0));
    }

    #[test]
    fn test_two_matches_is_absent() {
        let rows = vec![
            make_row(&["kurank", "4", "3840"]),
            make_row(&["Goal", "Score", "something"]),
        ];
        assert!(locate_header(&rows, &labels(), 3).is_none());
    }

    #[test]
    fn test_best_row_wins() {
        let rows = vec![
            make_row(&["Goal", "Assist", "Pass"]),
            make_row(&["Goal", "Assist", "Pass", "Interception", "Save", "Score"]),
        ];
        let loc = locate_header(&rows, &labels(), 3).unwrap();
        assert_eq!(loc.row_index, 1);
        assert_eq!(loc.columns.len(), 6);
    }

    #[test]
    fn test_empty_cells_do_not_shift_indices() {
        let rows = vec![make_row(&["", "Goal", " ", "Assist", "Pass"])];
        let loc = locate_header(&rows, &labels(), 3).unwrap();
        // Indices count non-empty cells only, matching the extractor's view.
        assert_eq!(loc.columns.get("goal"), Some(0));
        assert_eq!(loc.columns.get("assist"), Some(1));
        assert_eq!(loc.columns.get("pass"), Some(2));
    }
}
