use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use parity_report::dataset;
use parity_report::inequality;
use parity_report::report;
use parity_report::retention::{self, RetentionParams};
use parity_report::sample_data;
use parity_report::standings::{self, ScoringMode, StandingRow};

const DEFAULT_COHORT_SIZE: u32 = 3;
const DEFAULT_DEMO_SEED: u64 = 7;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }

    let demo = flag_present(&args, "--demo") || env_flag("PARITY_DEMO");
    let matches = if demo {
        let seed = parse_u64_option(&args, "--seed", "PARITY_SEED")?.unwrap_or(DEFAULT_DEMO_SEED);
        println!("Using synthetic demo dataset (seed {seed})");
        sample_data::demo_dataset(seed)
    } else {
        let Some(path) = path_option(&args, "--input", "PARITY_INPUT") else {
            print_usage();
            return Err(anyhow!(
                "no match table given (use --input, PARITY_INPUT, or --demo)"
            ));
        };
        let matches = dataset::load_matches(&path)
            .with_context(|| format!("failed to load match table {}", path.display()))?;
        println!("Loaded {} matches from {}", matches.len(), path.display());
        matches
    };
    if matches.is_empty() {
        eprintln!("[WARN] match table is empty; reports will be empty");
    }

    let mode = parse_mode(&args)?;
    let standings_rows = standings::build_standings(&matches, mode)?;

    let cohort_size = parse_u32_option(&args, "--cohort-size", "PARITY_COHORT_SIZE")?
        .unwrap_or(DEFAULT_COHORT_SIZE);
    let min_season = match parse_i32_option(&args, "--min-season", "PARITY_MIN_SEASON")? {
        Some(season) => season,
        None => default_min_season(&standings_rows),
    };
    let require_adjacent_seasons =
        !(flag_present(&args, "--season-gap-ok") || env_flag("PARITY_SEASON_GAP_OK"));
    let params = RetentionParams {
        cohort_size,
        min_season,
        require_adjacent_seasons,
    };

    println!(
        "Scoring mode: {}  cohort size: {}  season floor: {}  adjacent seasons required: {}",
        mode.as_str(),
        params.cohort_size,
        params.min_season,
        params.require_adjacent_seasons
    );

    let season_table = inequality::season_inequality(&standings_rows);
    let league_table = inequality::league_inequality(&standings_rows);
    let league_retention = retention::analyze_retention(&standings_rows, &params)?;
    let summaries = retention::join_inequality(league_retention, &league_table);

    println!("Standings rows: {}", standings_rows.len());
    println!();
    report::print_season_inequality(&season_table);
    println!();
    report::print_league_summaries(&summaries);

    let artifact = report::build_artifact(mode, &params, season_table, summaries);

    if let Some(path) = path_option(&args, "--xlsx", "PARITY_XLSX") {
        let export = report::export_workbook(&path, &artifact, &standings_rows)?;
        println!();
        println!(
            "Workbook written: {} ({} standings rows, {} season rows, {} league rows)",
            path.display(),
            export.standings_rows,
            export.season_rows,
            export.league_rows
        );
    }
    if let Some(path) = path_option(&args, "--json", "PARITY_JSON") {
        report::write_json_artifact(&path, &artifact)?;
        println!("Artifact written: {}", path.display());
    }

    Ok(())
}

/// Defaults to the second-lowest season present, so the earliest season
/// (which cannot have a prior) stays out of the denominator. A single-season
/// table gets a floor above it and surfaces the undefined-rate error.
fn default_min_season(standings: &[StandingRow]) -> i32 {
    let mut seasons: Vec<i32> = standings.iter().map(|row| row.season).collect();
    seasons.sort_unstable();
    seasons.dedup();
    match seasons.len() {
        0 => 0,
        1 => seasons[0] + 1,
        _ => seasons[1],
    }
}

fn parse_mode(args: &[String]) -> Result<ScoringMode> {
    let Some(raw) = arg_value(args, "--mode").or_else(|| env_value("PARITY_SCORING_MODE")) else {
        return Ok(ScoringMode::Mean);
    };
    ScoringMode::parse(&raw)
        .ok_or_else(|| anyhow!("unrecognized scoring mode '{raw}' (expected sum or mean)"))
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            if !raw.trim().is_empty() {
                return Some(raw.trim().to_string());
            }
        }
        if arg == name {
            if let Some(next) = args.get(idx + 1) {
                if !next.trim().is_empty() {
                    return Some(next.trim().to_string());
                }
            }
        }
    }
    None
}

fn flag_present(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn env_value(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_flag(key: &str) -> bool {
    env_value(key).is_some_and(|raw| {
        matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}

fn path_option(args: &[String], name: &str, env: &str) -> Option<PathBuf> {
    arg_value(args, name)
        .or_else(|| env_value(env))
        .map(PathBuf::from)
}

fn parse_u32_option(args: &[String], name: &str, env: &str) -> Result<Option<u32>> {
    let Some(raw) = arg_value(args, name).or_else(|| env_value(env)) else {
        return Ok(None);
    };
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| anyhow!("invalid value '{raw}' for {name}"))
}

fn parse_i32_option(args: &[String], name: &str, env: &str) -> Result<Option<i32>> {
    let Some(raw) = arg_value(args, name).or_else(|| env_value(env)) else {
        return Ok(None);
    };
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| anyhow!("invalid value '{raw}' for {name}"))
}

fn parse_u64_option(args: &[String], name: &str, env: &str) -> Result<Option<u64>> {
    let Some(raw) = arg_value(args, name).or_else(|| env_value(env)) else {
        return Ok(None);
    };
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| anyhow!("invalid value '{raw}' for {name}"))
}

fn print_usage() {
    println!("Usage: parity_report [--input <matches.csv|matches.parquet>] [--mode sum|mean]");
    println!("                     [--cohort-size N] [--min-season N] [--season-gap-ok]");
    println!("                     [--xlsx <path>] [--json <path>] [--demo] [--seed N]");
    println!();
    println!("Builds season standings from match results, scores each league's");
    println!("points concentration, and reports how often top-cohort teams repeat.");
    println!();
    println!("Environment fallbacks: PARITY_INPUT, PARITY_SCORING_MODE, PARITY_COHORT_SIZE,");
    println!("PARITY_MIN_SEASON, PARITY_SEASON_GAP_OK, PARITY_XLSX, PARITY_JSON,");
    println!("PARITY_DEMO, PARITY_SEED.");
}
