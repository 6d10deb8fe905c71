use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::inequality::GroupInequality;
use crate::retention::{RetentionParams, RetentionSummary};
use crate::standings::{ScoringMode, StandingRow};

pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityArtifact {
    pub version: u32,
    pub generated_at: String,
    pub scoring_mode: String,
    pub cohort_size: u32,
    pub min_season: i32,
    pub require_adjacent_seasons: bool,
    pub season_inequality: Vec<GroupInequality>,
    pub league_summaries: Vec<RetentionSummary>,
}

pub struct ExportReport {
    pub standings_rows: usize,
    pub season_rows: usize,
    pub league_rows: usize,
}

pub fn build_artifact(
    mode: ScoringMode,
    params: &RetentionParams,
    season_inequality: Vec<GroupInequality>,
    league_summaries: Vec<RetentionSummary>,
) -> ParityArtifact {
    ParityArtifact {
        version: ARTIFACT_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        scoring_mode: mode.as_str().to_string(),
        cohort_size: params.cohort_size,
        min_season: params.min_season,
        require_adjacent_seasons: params.require_adjacent_seasons,
        season_inequality,
        league_summaries,
    }
}

pub fn print_season_inequality(rows: &[GroupInequality]) {
    println!("Season inequality");
    println!("  {:<8} {:>6} {:>12}", "league", "season", "coefficient");
    for row in rows {
        let season = row
            .season
            .map(|s| s.to_string())
            .unwrap_or_else(|| "all".to_string());
        println!(
            "  {:<8} {:>6} {:>12.4}",
            row.league, season, row.coefficient
        );
    }
}

pub fn print_league_summaries(rows: &[RetentionSummary]) {
    println!("League summary (aggregate inequality vs top-cohort retention)");
    println!(
        "  {:<8} {:>6} {:>8} {:>10} {:>12}",
        "league", "top", "repeat", "retention", "inequality"
    );
    for row in rows {
        println!(
            "  {:<8} {:>6} {:>8} {:>10.4} {:>12.4}",
            row.league, row.cohort_appearances, row.repeats, row.retention_rate, row.inequality
        );
    }
}

pub fn export_workbook(
    path: &Path,
    artifact: &ParityArtifact,
    standings: &[StandingRow],
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name("Summary")?;
    write_summary_sheet(summary_sheet, artifact, standings.len())?;

    let season_sheet = workbook.add_worksheet();
    season_sheet.set_name("SeasonInequality")?;
    write_season_sheet(season_sheet, &artifact.season_inequality)?;

    let league_sheet = workbook.add_worksheet();
    league_sheet.set_name("LeagueSummary")?;
    write_league_sheet(league_sheet, &artifact.league_summaries)?;

    let standings_sheet = workbook.add_worksheet();
    standings_sheet.set_name("Standings")?;
    write_standings_sheet(standings_sheet, standings)?;

    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook to {}", path.display()))?;

    Ok(ExportReport {
        standings_rows: standings.len(),
        season_rows: artifact.season_inequality.len(),
        league_rows: artifact.league_summaries.len(),
    })
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    artifact: &ParityArtifact,
    standings_rows: usize,
) -> Result<()> {
    let pairs = [
        ("Generated at", artifact.generated_at.clone()),
        ("Scoring mode", artifact.scoring_mode.clone()),
        ("Cohort size", artifact.cohort_size.to_string()),
        ("Season floor", artifact.min_season.to_string()),
        (
            "Adjacent seasons required",
            artifact.require_adjacent_seasons.to_string(),
        ),
        ("Standings rows", standings_rows.to_string()),
        (
            "Season inequality rows",
            artifact.season_inequality.len().to_string(),
        ),
        (
            "League summary rows",
            artifact.league_summaries.len().to_string(),
        ),
    ];
    for (idx, (label, value)) in pairs.iter().enumerate() {
        let row = idx as u32;
        sheet
            .write_string(row, 0, *label)
            .with_context(|| format!("failed to write summary label row {row}"))?;
        sheet
            .write_string(row, 1, value.as_str())
            .with_context(|| format!("failed to write summary value row {row}"))?;
    }
    Ok(())
}

fn write_header(sheet: &mut Worksheet, titles: &[&str]) -> Result<()> {
    for (col, title) in titles.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *title)
            .with_context(|| format!("failed to write header cell {col}"))?;
    }
    Ok(())
}

fn write_season_sheet(sheet: &mut Worksheet, rows: &[GroupInequality]) -> Result<()> {
    write_header(sheet, &["League", "Season", "Inequality"])?;
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.league.as_str())?;
        match row.season {
            Some(season) => sheet.write_number(r, 1, season as f64)?,
            None => sheet.write_string(r, 1, "all")?,
        };
        sheet.write_number(r, 2, row.coefficient)?;
    }
    Ok(())
}

fn write_league_sheet(sheet: &mut Worksheet, rows: &[RetentionSummary]) -> Result<()> {
    write_header(
        sheet,
        &[
            "League",
            "CohortAppearances",
            "Repeats",
            "RetentionRate",
            "Inequality",
        ],
    )?;
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.league.as_str())?;
        sheet.write_number(r, 1, row.cohort_appearances as f64)?;
        sheet.write_number(r, 2, row.repeats as f64)?;
        sheet.write_number(r, 3, row.retention_rate)?;
        sheet.write_number(r, 4, row.inequality)?;
    }
    Ok(())
}

fn write_standings_sheet(sheet: &mut Worksheet, rows: &[StandingRow]) -> Result<()> {
    write_header(sheet, &["League", "Season", "Team", "Points", "Played"])?;
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.league.as_str())?;
        sheet.write_number(r, 1, row.season as f64)?;
        sheet.write_string(r, 2, row.team.as_str())?;
        sheet.write_number(r, 3, row.points)?;
        sheet.write_number(r, 4, row.matches_played as f64)?;
    }
    Ok(())
}

pub fn write_json_artifact(path: &Path, artifact: &ParityArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let raw = serde_json::to_string_pretty(artifact).context("failed to serialize artifact")?;
    fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
