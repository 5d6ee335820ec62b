//! Arithmetic cross-check between resolved stats and the OCR'd score.

use super::types::{Checksum, PlayerRow};
use crate::config::ScoreboardConfig;

/// Recomputes the expected score as the weighted sum of the stat fields and
/// compares it to the score the OCR read. Diagnostic only: a mismatch is
/// flagged, never used to drop or correct the row. Any non-numeric stat or
/// score skips the check as undetermined, since scores may legitimately
/// include event types outside the tracked stats.
pub fn verify(row: &PlayerRow, cfg: &ScoreboardConfig) -> Checksum {
    if row.stats.len() != cfg.score_weights.len() {
        return Checksum::Undetermined;
    }

    let mut expected: u32 = 0;
    for (stat, weight) in row.stats.iter().zip(&cfg.score_weights) {
        match stat.parse::<u32>() {
            Ok(value) => expected = expected.saturating_add(value.saturating_mul(*weight)),
            Err(_) => return Checksum::Undetermined,
        }
    }

    match row.score.parse::<u32>() {
        Ok(actual) if actual == expected => Checksum::Match { expected },
        Ok(actual) => Checksum::Mismatch { expected, actual },
        Err(_) => Checksum::Undetermined,
    }
}
