//! Repairs noisy OCR name strings against the configured roster.

use std::collections::HashMap;

/// Fuzzy matches below this ratio pass the raw string through unchanged.
const NAME_MATCH_THRESHOLD: f32 = 0.5;

/// Maps a raw OCR name to a canonical one. Exact correction-table hits win
/// immediately; otherwise the roster name with the best positional
/// similarity is used when its ratio clears the threshold, else the raw
/// string is returned as-is. The roster only repairs names, it never
/// filters unknown ones out.
pub fn fix_name(raw: &str, corrections: &HashMap<String, String>, roster: &[String]) -> String {
    let raw = raw.trim();
    if let Some(fixed) = corrections.get(raw) {
        return fixed.clone();
    }

    let mut best: Option<&String> = None;
    let mut best_ratio = 0.0f32;
    for name in roster {
        let ratio = similarity(raw, name);
        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(name);
        }
    }

    match best {
        Some(name) if best_ratio > NAME_MATCH_THRESHOLD => name.clone(),
        _ => raw.to_string(),
    }
}

/// Position-aligned character similarity: equal characters at the same index
/// (case-insensitive) divided by the candidate's length. Rewards same-length
/// same-position matches; deliberately not an edit distance.
fn similarity(raw: &str, candidate: &str) -> f32 {
    let matches = raw
        .to_lowercase()
        .chars()
        .zip(candidate.to_lowercase().chars())
        .filter(|(a, b)| a == b)
        .count();
    matches as f32 / candidate.chars().count().max(1) as f32
}
