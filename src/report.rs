//! Output glue: console table, run summary, and CSV serialization.
//!
//! Consumes the structured reconciliation result only; all decisions were
//! made upstream.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::ScoreboardConfig;
use crate::reconcile::types::{Checksum, PlayerRow, Strategy};
use crate::reconcile::Reconciliation;

/// Prints the resolved scoreboard as a fixed-width table, with a checksum
/// note appended to rows whose recomputed score disagrees with the OCR one.
pub fn print_table(rows: &[PlayerRow], cfg: &ScoreboardConfig) {
    let has_teams = rows.iter().any(|r| r.team.is_some());

    let mut header = String::new();
    if has_teams {
        header.push_str(&format!("{:<6} ", "Team"));
    }
    header.push_str(&format!("{:<16}", "Name"));
    for field in &cfg.stat_fields {
        header.push_str(&format!(" {:>width$}", field, width = field.len().max(4)));
    }
    header.push_str(&format!(" {:>7} {:>5}", "Score", "MVP"));
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for row in rows {
        let mut line = String::new();
        if has_teams {
            line.push_str(&format!("{:<6} ", row.team.as_deref().unwrap_or("")));
        }
        line.push_str(&format!("{:<16}", row.name));
        for (field, value) in cfg.stat_fields.iter().zip(&row.stats) {
            line.push_str(&format!(" {:>width$}", value, width = field.len().max(4)));
        }
        line.push_str(&format!(
            " {:>7} {:>5}",
            row.score,
            if row.is_mvp { "MVP" } else { "" }
        ));
        if let Checksum::Mismatch { expected, actual } = row.checksum {
            line.push_str(&format!("   [!] Score mismatch: calc={} ocr={}", expected, actual));
        }
        println!("{}", line);
    }
    println!("{}", "=".repeat(header.len()));
}

/// Prints the end-of-run accuracy summary.
pub fn print_summary(result: &Reconciliation, cfg: &ScoreboardConfig) {
    let s = &result.summary;
    let expected = cfg.roster.len();

    let approach = match s.strategy {
        Strategy::Primary => "Full-table OCR",
        Strategy::Fallback => "Row-crop OCR",
    };
    println!("\n--- Summary ---");
    println!("Approach: {}. Rows found: {}", approach, s.rows_found);
    if s.rows_dropped > 0 {
        println!("Rows dropped as too broken: {}", s.rows_dropped);
    }
    if expected > 0 {
        let pct = s.players_matched as f64 / expected as f64 * 100.0;
        println!("Players detected: {}/{} ({:.1}%)", s.players_matched, expected, pct);
    }
    println!(
        "Rows with all stats filled: {}/{}",
        s.rows_fully_statted, s.rows_found
    );
    let total_fields = s.rows_found * cfg.stat_fields.len();
    println!(
        "Stat fields filled: {}/{}",
        s.stat_fields_filled, total_fields
    );
    if s.checksum_mismatches > 0 {
        println!("Score checksum mismatches: {}", s.checksum_mismatches);
    }
}

/// Writes the resolved rows as CSV:
/// `Team,Name,<stat fields..>,Score,is_mvp`.
pub fn write_csv(path: &Path, rows: &[PlayerRow], cfg: &ScoreboardConfig) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    let mut header = vec!["Team".to_string(), "Name".to_string()];
    header.extend(cfg.stat_fields.iter().cloned());
    header.push("Score".to_string());
    header.push("is_mvp".to_string());
    writeln!(file, "{}", header.join(",")).context("Failed to write CSV header")?;

    for row in rows {
        // Stats and scores are comma-stripped upstream; names and team
        // labels are not, and a stray comma would shift every cell after it.
        let mut fields = vec![
            row.team.as_deref().unwrap_or("").replace(',', ""),
            row.name.replace(',', ""),
        ];
        fields.extend(row.stats.iter().cloned());
        fields.push(row.score.clone());
        fields.push(row.is_mvp.to_string());
        writeln!(file, "{}", fields.join(",")).context("Failed to write CSV row")?;
    }

    Ok(())
}
