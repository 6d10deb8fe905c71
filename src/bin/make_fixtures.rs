use std::path::PathBuf;

use anyhow::{Context, Result};

use parity_report::sample_data;

const DEFAULT_OUT: &str = "demo_matches.csv";
const DEFAULT_SEED: u64 = 7;

// Writes the synthetic demo dataset as a CSV match table, so the main
// binary has a file to chew on without real data.
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out = parse_out_arg(&args).unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    let seed = parse_seed_arg(&args).unwrap_or(DEFAULT_SEED);

    let matches = sample_data::demo_dataset(seed);

    let mut writer = csv::Writer::from_path(&out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    writer
        .write_record([
            "Division",
            "Season",
            "home_team_id",
            "away_team_id",
            "FullTimeHomeGoals",
            "FullTimeAwayGoals",
        ])
        .context("failed to write header row")?;
    for result in &matches {
        writer
            .write_record([
                result.league.clone(),
                result.season.to_string(),
                result.home_team.clone(),
                result.away_team.clone(),
                result.home_goals.to_string(),
                result.away_goals.to_string(),
            ])
            .context("failed to write match row")?;
    }
    writer.flush().context("failed to flush csv")?;

    println!(
        "Fixture table written: {} ({} matches, seed {seed})",
        out.display(),
        matches.len()
    );
    Ok(())
}

fn parse_out_arg(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--out=") {
            if !raw.trim().is_empty() {
                return Some(PathBuf::from(raw.trim()));
            }
        }
        if arg == "--out" {
            if let Some(next) = args.get(idx + 1) {
                if !next.trim().is_empty() {
                    return Some(PathBuf::from(next.trim()));
                }
            }
        }
    }
    None
}

fn parse_seed_arg(args: &[String]) -> Option<u64> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--seed=") {
            if let Ok(seed) = raw.trim().parse() {
                return Some(seed);
            }
        }
        if arg == "--seed" {
            if let Some(next) = args.get(idx + 1) {
                if let Ok(seed) = next.trim().parse() {
                    return Some(seed);
                }
            }
        }
    }
    None
}
