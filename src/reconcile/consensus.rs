//! Reduces repeated OCR readings of one field to a single trusted value.

use std::sync::OnceLock;

use regex::Regex;

use super::names;
use super::types::{CandidateRow, CandidateSet, Checksum, PlayerRow};
use crate::config::ScoreboardConfig;

/// Pattern for numeric candidate strings: decimal digits with at most one
/// fractional separator.
const NUMERIC_PATTERN: &str = r"^(\d+|\d+\.\d*|\d*\.\d+)$";

static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();

fn is_numeric(text: &str) -> bool {
    NUMERIC_RE
        .get_or_init(|| Regex::new(NUMERIC_PATTERN).expect("numeric pattern is valid"))
        .is_match(text)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Picks one value from a candidate set by plurality vote.
///
/// Empty readings are dropped first; with `numeric` set, non-numeric ones
/// too. The most frequent survivor wins, ties broken by first-encountered
/// order. A numeric field whose best candidate occurs only once among two
/// or more readings is a hung vote: the median of the integer candidates is
/// taken instead (even-length lists pick the upper-middle element), since a
/// split of noisy single-digit reads is common and the median damps
/// outliers better than an arbitrary tie-break.
pub fn resolve(candidates: &CandidateSet, numeric: bool) -> String {
    let mut values: Vec<&str> = candidates
        .values()
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if numeric {
        values.retain(|v| is_numeric(v));
    }
    if values.is_empty() {
        return String::new();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for &value in &values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    let mut winner = counts[0];
    for &(value, n) in &counts[1..] {
        if n > winner.1 {
            winner = (value, n);
        }
    }

    if numeric && winner.1 == 1 && values.len() > 1 {
        let mut nums: Vec<u64> = values
            .iter()
            .filter(|v| is_digits(v))
            .filter_map(|v| v.parse().ok())
            .collect();
        if nums.is_empty() {
            return String::new();
        }
        nums.sort_unstable();
        return nums[nums.len() / 2].to_string();
    }

    winner.0.to_string()
}

/// Specialized resolver for the score column. Zero and empty readings are
/// discarded up front, then candidates of 3+ digits are preferred (scores
/// are rarely single or double digit) before falling back to all digit
/// candidates, with the usual plurality/median rule on whichever group won.
pub fn resolve_score(candidates: &CandidateSet) -> String {
    let non_zero: Vec<&str> = candidates
        .values()
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != "0")
        .collect();
    let digits: Vec<&str> = non_zero.iter().copied().filter(|v| is_digits(v)).collect();
    let likely: Vec<&str> = digits
        .iter()
        .copied()
        .filter(|v| v.chars().count() >= 3)
        .collect();

    if !likely.is_empty() {
        resolve(&CandidateSet::from_values(likely), true)
    } else if !digits.is_empty() {
        resolve(&CandidateSet::from_values(digits), true)
    } else {
        String::new()
    }
}

/// Resolves every field of a candidate row and applies the row-acceptance
/// rule: a row where fewer than the configured minimum of
/// {name, stats.., score} resolved is discarded entirely, since a mostly
/// broken row would silently corrupt downstream aggregation.
pub fn resolve_row(row: &CandidateRow, cfg: &ScoreboardConfig) -> Option<PlayerRow> {
    let name = names::fix_name(&resolve(&row.name, false), &cfg.name_corrections, &cfg.roster);
    let stats: Vec<String> = row.stats.iter().map(|set| resolve(set, true)).collect();
    let score = resolve_score(&row.score);

    let resolved = usize::from(!name.is_empty())
        + stats.iter().filter(|s| !s.is_empty()).count()
        + usize::from(!score.is_empty());
    if resolved < cfg.min_resolved_fields {
        return None;
    }

    Some(PlayerRow {
        team: row.team.clone(),
        name,
        stats,
        score,
        is_mvp: row.is_mvp,
        checksum: Checksum::Undetermined,
    })
}
