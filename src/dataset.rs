use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Row, RowAccessor};

use crate::errors::AnalysisError;
use crate::results::MatchResult;

// Accepted header spellings, matched case-insensitively. The first group in
// each list is the canonical export name; the short codes are the
// football-data conventions seen in public match dumps.
const LEAGUE_COLUMNS: &[&str] = &["division", "league", "league_id", "div"];
const SEASON_COLUMNS: &[&str] = &["season"];
const HOME_TEAM_COLUMNS: &[&str] = &["home_team_id", "hometeam", "home_team"];
const AWAY_TEAM_COLUMNS: &[&str] = &["away_team_id", "awayteam", "away_team"];
const HOME_GOALS_COLUMNS: &[&str] = &["fulltimehomegoals", "fthg", "home_goals"];
const AWAY_GOALS_COLUMNS: &[&str] = &["fulltimeawaygoals", "ftag", "away_goals"];

/// Loads a match table, picking the reader from the file extension.
pub fn load_matches(path: &Path) -> Result<Vec<MatchResult>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" => read_matches_parquet(path),
        "csv" => read_matches_csv(path),
        other => Err(anyhow!(
            "unsupported match table format '{other}' (expected .csv or .parquet): {}",
            path.display()
        )),
    }
}

#[derive(Debug)]
struct ColumnMap {
    league: usize,
    season: usize,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
}

impl ColumnMap {
    fn resolve(names: &[String]) -> Result<Self> {
        Ok(ColumnMap {
            league: find_column(names, LEAGUE_COLUMNS)?,
            season: find_column(names, SEASON_COLUMNS)?,
            home_team: find_column(names, HOME_TEAM_COLUMNS)?,
            away_team: find_column(names, AWAY_TEAM_COLUMNS)?,
            home_goals: find_column(names, HOME_GOALS_COLUMNS)?,
            away_goals: find_column(names, AWAY_GOALS_COLUMNS)?,
        })
    }
}

fn find_column(names: &[String], wanted: &[&str]) -> Result<usize> {
    names
        .iter()
        .position(|name| wanted.contains(&name.as_str()))
        .ok_or_else(|| anyhow!("match table is missing a required column (any of {wanted:?})"))
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

pub fn read_matches_csv(path: &Path) -> Result<Vec<MatchResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open match table {}", path.display()))?;

    let names: Vec<String> = reader
        .headers()
        .context("failed to read csv header row")?
        .iter()
        .map(normalize_header)
        .collect();
    let columns = ColumnMap::resolve(&names)?;

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Data rows start on line 2, after the header.
        let row = idx + 2;
        let record = record.with_context(|| format!("failed to read csv row {row}"))?;
        out.push(parse_csv_record(&record, &columns, row)?);
    }
    Ok(out)
}

fn parse_csv_record(
    record: &csv::StringRecord,
    columns: &ColumnMap,
    row: usize,
) -> Result<MatchResult> {
    let league = text_field(record, columns.league, row, "league")?;
    let season_raw = text_field(record, columns.season, row, "season")?;
    let home_team = text_field(record, columns.home_team, row, "home team")?;
    let away_team = text_field(record, columns.away_team, row, "away team")?;
    let home_raw = text_field(record, columns.home_goals, row, "home goals")?;
    let away_raw = text_field(record, columns.away_goals, row, "away goals")?;

    let result = MatchResult {
        league: league.to_string(),
        season: parse_season_text(season_raw).map_err(|reason| invalid(row, reason))?,
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_goals: parse_goals_text(home_raw).map_err(|reason| invalid(row, reason))?,
        away_goals: parse_goals_text(away_raw).map_err(|reason| invalid(row, reason))?,
    };
    result
        .validate()
        .map_err(|reason| invalid(row, reason))?;
    Ok(result)
}

fn text_field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    row: usize,
    what: &str,
) -> Result<&'a str, AnalysisError> {
    match record.get(idx) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(invalid(row, format!("missing {what} value"))),
    }
}

fn invalid(row: usize, reason: String) -> AnalysisError {
    AnalysisError::InvalidRecord { row, reason }
}

pub fn read_matches_parquet(path: &Path) -> Result<Vec<MatchResult>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open match table {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("failed to read parquet container {}", path.display()))?;

    let names: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|column| normalize_header(column.name()))
        .collect();
    let columns = ColumnMap::resolve(&names)?;

    let iter = reader
        .get_row_iter(None)
        .context("failed to iterate parquet rows")?;
    let mut out = Vec::new();
    for (idx, row) in iter.enumerate() {
        let row_no = idx + 1;
        let row = row.with_context(|| format!("failed to decode parquet row {row_no}"))?;
        out.push(parse_parquet_row(&row, &columns, row_no)?);
    }
    Ok(out)
}

fn parse_parquet_row(row: &Row, columns: &ColumnMap, row_no: usize) -> Result<MatchResult> {
    let league = string_cell(row, columns.league)
        .ok_or_else(|| invalid(row_no, "missing league value".to_string()))?;
    let home_team = string_cell(row, columns.home_team)
        .ok_or_else(|| invalid(row_no, "missing home team value".to_string()))?;
    let away_team = string_cell(row, columns.away_team)
        .ok_or_else(|| invalid(row_no, "missing away team value".to_string()))?;
    let season = numeric_cell(row, columns.season)
        .ok_or_else(|| invalid(row_no, "missing season value".to_string()))
        .and_then(|v| season_from_f64(v).map_err(|reason| invalid(row_no, reason)))?;
    let home_goals = numeric_cell(row, columns.home_goals)
        .ok_or_else(|| invalid(row_no, "missing home goals value".to_string()))
        .and_then(|v| goals_from_f64(v).map_err(|reason| invalid(row_no, reason)))?;
    let away_goals = numeric_cell(row, columns.away_goals)
        .ok_or_else(|| invalid(row_no, "missing away goals value".to_string()))
        .and_then(|v| goals_from_f64(v).map_err(|reason| invalid(row_no, reason)))?;

    let result = MatchResult {
        league,
        season,
        home_team,
        away_team,
        home_goals,
        away_goals,
    };
    result
        .validate()
        .map_err(|reason| invalid(row_no, reason))?;
    Ok(result)
}

fn string_cell(row: &Row, idx: usize) -> Option<String> {
    if let Ok(value) = row.get_string(idx) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        return Some(trimmed.to_string());
    }
    if let Ok(value) = row.get_long(idx) {
        return Some(value.to_string());
    }
    if let Ok(value) = row.get_int(idx) {
        return Some(value.to_string());
    }
    None
}

fn numeric_cell(row: &Row, idx: usize) -> Option<f64> {
    if let Ok(value) = row.get_double(idx) {
        return Some(value);
    }
    if let Ok(value) = row.get_float(idx) {
        return Some(value as f64);
    }
    if let Ok(value) = row.get_long(idx) {
        return Some(value as f64);
    }
    if let Ok(value) = row.get_int(idx) {
        return Some(value as f64);
    }
    if let Ok(value) = row.get_string(idx) {
        return value.trim().parse::<f64>().ok();
    }
    None
}

fn parse_season_text(raw: &str) -> Result<i32, String> {
    if let Ok(value) = raw.parse::<i32>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) => season_from_f64(value),
        Err(_) => Err(format!("unparseable season value '{raw}'")),
    }
}

fn season_from_f64(value: f64) -> Result<i32, String> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("non-integer season value '{value}'"));
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(format!("season value '{value}' out of range"));
    }
    Ok(value as i32)
}

fn parse_goals_text(raw: &str) -> Result<u32, String> {
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) => goals_from_f64(value),
        Err(_) => Err(format!("unparseable goals value '{raw}'")),
    }
}

fn goals_from_f64(value: f64) -> Result<u32, String> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("non-integer goals value '{value}'"));
    }
    if value < 0.0 {
        return Err(format!("negative goals value '{value}'"));
    }
    if value > u32::MAX as f64 {
        return Err(format!("goals value '{value}' out of range"));
    }
    Ok(value as u32)
}
