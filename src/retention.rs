use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::inequality::GroupInequality;
use crate::standings::{StandingRow, compare_rows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStandingRow {
    pub league: String,
    pub season: i32,
    pub team: String,
    pub points: f64,
    pub rank: u32,
    pub top_cohort: bool,
}

/// When `require_adjacent_seasons` is set a carried flag only counts if the
/// previous appearance was exactly one season earlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionParams {
    pub cohort_size: u32,
    pub min_season: i32,
    pub require_adjacent_seasons: bool,
}

impl Default for RetentionParams {
    fn default() -> Self {
        RetentionParams {
            cohort_size: 3,
            min_season: i32::MIN,
            require_adjacent_seasons: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRetention {
    pub league: String,
    pub cohort_appearances: u32,
    pub repeats: u32,
    pub retention_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSummary {
    pub league: String,
    pub cohort_appearances: u32,
    pub repeats: u32,
    pub retention_rate: f64,
    pub inequality: f64,
}

pub fn rank_standings(standings: &[StandingRow], cohort_size: u32) -> Vec<RankedStandingRow> {
    let mut rows: Vec<&StandingRow> = standings.iter().collect();
    rows.sort_by(|a, b| compare_rows(a, b));

    let mut out = Vec::with_capacity(rows.len());
    let mut current: Option<(&str, i32)> = None;
    let mut rank = 0u32;
    for row in rows {
        let key = (row.league.as_str(), row.season);
        if current != Some(key) {
            current = Some(key);
            rank = 0;
        }
        rank += 1;
        out.push(RankedStandingRow {
            league: row.league.clone(),
            season: row.season,
            team: row.team.clone(),
            points: row.points,
            rank,
            top_cohort: rank <= cohort_size,
        });
    }
    out
}

/// History is keyed by team alone, so a club moving between leagues carries
/// its cohort flag along. Rows before `min_season` feed the history but are
/// not tallied; a league with no tallied cohort appearances fails the run.
pub fn analyze_retention(
    standings: &[StandingRow],
    params: &RetentionParams,
) -> Result<Vec<LeagueRetention>, AnalysisError> {
    let ranked = rank_standings(standings, params.cohort_size);

    let mut by_team: HashMap<&str, Vec<&RankedStandingRow>> = HashMap::new();
    for row in &ranked {
        by_team.entry(row.team.as_str()).or_default().push(row);
    }

    // league -> (cohort appearances, repeats)
    let mut tallies: HashMap<&str, (u32, u32)> = HashMap::new();
    for rows in by_team.values_mut() {
        rows.sort_by_key(|r| r.season);
        let mut prev: Option<(i32, bool)> = None;
        for row in rows.iter() {
            let carried = match prev {
                Some((season, flag))
                    if !params.require_adjacent_seasons
                        || season.checked_add(1) == Some(row.season) =>
                {
                    flag
                }
                _ => false,
            };
            if row.season >= params.min_season {
                let tally = tallies.entry(row.league.as_str()).or_default();
                if row.top_cohort {
                    tally.0 += 1;
                    if carried {
                        tally.1 += 1;
                    }
                }
            }
            prev = Some((row.season, row.top_cohort));
        }
    }

    let mut leagues: Vec<&str> = tallies.keys().copied().collect();
    leagues.sort_unstable();

    let mut out = Vec::with_capacity(leagues.len());
    for league in leagues {
        let (appearances, repeats) = tallies[league];
        if appearances == 0 {
            return Err(AnalysisError::UndefinedRetentionRate {
                league: league.to_string(),
            });
        }
        out.push(LeagueRetention {
            league: league.to_string(),
            cohort_appearances: appearances,
            repeats,
            retention_rate: repeats as f64 / appearances as f64,
        });
    }
    Ok(out)
}

pub fn join_inequality(
    retention: Vec<LeagueRetention>,
    aggregates: &[GroupInequality],
) -> Vec<RetentionSummary> {
    let coefficients: HashMap<&str, f64> = aggregates
        .iter()
        .filter(|g| g.season.is_none())
        .map(|g| (g.league.as_str(), g.coefficient))
        .collect();

    retention
        .into_iter()
        .filter_map(|r| {
            let inequality = coefficients.get(r.league.as_str()).copied()?;
            Some(RetentionSummary {
                league: r.league,
                cohort_appearances: r.cohort_appearances,
                repeats: r.repeats,
                retention_rate: r.retention_rate,
                inequality,
            })
        })
        .collect()
}
