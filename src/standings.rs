use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::results::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    Sum,
    Mean,
}

impl ScoringMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sum" | "total" => Some(ScoringMode::Sum),
            "mean" | "avg" | "average" => Some(ScoringMode::Mean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Sum => "sum",
            ScoringMode::Mean => "mean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub league: String,
    pub season: i32,
    pub team: String,
    pub points: f64,
    pub matches_played: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointsAcc {
    points: u32,
    played: u32,
}

pub fn build_standings(
    matches: &[MatchResult],
    mode: ScoringMode,
) -> Result<Vec<StandingRow>, AnalysisError> {
    let mut acc: HashMap<(String, i32, String), PointsAcc> = HashMap::new();

    for (idx, result) in matches.iter().enumerate() {
        result
            .validate()
            .map_err(|reason| AnalysisError::InvalidRecord { row: idx + 1, reason })?;
        let (home_points, away_points) = result.points();
        credit(
            &mut acc,
            &result.league,
            result.season,
            &result.home_team,
            home_points,
        );
        credit(
            &mut acc,
            &result.league,
            result.season,
            &result.away_team,
            away_points,
        );
    }

    let mut rows: Vec<StandingRow> = acc
        .into_iter()
        .map(|((league, season, team), totals)| {
            let points = match mode {
                ScoringMode::Sum => totals.points as f64,
                // played is at least 1 whenever an entry exists.
                ScoringMode::Mean => totals.points as f64 / totals.played as f64,
            };
            StandingRow {
                league,
                season,
                team,
                points,
                matches_played: totals.played,
            }
        })
        .collect();

    rows.sort_by(compare_rows);
    Ok(rows)
}

/// League, season, points descending, then team identifier to break ties.
/// Shared with the ranking pass so both tables order identically.
pub fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    a.league
        .cmp(&b.league)
        .then(a.season.cmp(&b.season))
        .then(
            b.points
                .partial_cmp(&a.points)
                .unwrap_or(Ordering::Equal),
        )
        .then(a.team.cmp(&b.team))
}

fn credit(
    acc: &mut HashMap<(String, i32, String), PointsAcc>,
    league: &str,
    season: i32,
    team: &str,
    points: u32,
) {
    let entry = acc
        .entry((league.to_string(), season, team.to_string()))
        .or_default();
    entry.points += points;
    entry.played += 1;
}
