use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::standings::StandingRow;

/// Keeps the rank weighting defined when every value in a group is zero.
pub const GINI_EPSILON: f64 = 1e-7;

/// `season` is None for the per-league aggregate over all seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInequality {
    pub league: String,
    pub season: Option<i32>,
    pub coefficient: f64,
}

/// Gini-style concentration of a points distribution, in [0, 1).
///
/// Values are shifted by the minimum when any are negative, nudged by
/// `GINI_EPSILON`, sorted ascending, then weighted by rank:
/// `sum((2i - n - 1) * x_i) / (n * sum(x_i))` for 1-based rank i.
pub fn gini_coefficient(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyGroup);
    }

    let mut shifted = values.to_vec();
    let min = shifted.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        for value in &mut shifted {
            *value -= min;
        }
    }
    for value in &mut shifted {
        *value += GINI_EPSILON;
    }
    shifted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = shifted.len() as f64;
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (idx, value) in shifted.iter().enumerate() {
        let rank = (idx + 1) as f64;
        weighted += (2.0 * rank - n - 1.0) * value;
        total += value;
    }
    Ok(weighted / (n * total))
}

pub fn season_inequality(standings: &[StandingRow]) -> Vec<GroupInequality> {
    let mut groups: HashMap<(&str, i32), Vec<f64>> = HashMap::new();
    for row in standings {
        groups
            .entry((row.league.as_str(), row.season))
            .or_default()
            .push(row.points);
    }
    let mut keyed: Vec<((&str, i32), Vec<f64>)> = groups.into_iter().collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    keyed
        .par_iter()
        .map(|((league, season), points)| GroupInequality {
            league: league.to_string(),
            season: Some(*season),
            // Groups built from rows always hold at least one value.
            coefficient: gini_coefficient(points).unwrap_or(0.0),
        })
        .collect()
}

pub fn league_inequality(standings: &[StandingRow]) -> Vec<GroupInequality> {
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in standings {
        groups.entry(row.league.as_str()).or_default().push(row.points);
    }
    let mut keyed: Vec<(&str, Vec<f64>)> = groups.into_iter().collect();
    keyed.sort_by(|a, b| a.0.cmp(b.0));

    keyed
        .par_iter()
        .map(|(league, points)| GroupInequality {
            league: league.to_string(),
            season: None,
            coefficient: gini_coefficient(points).unwrap_or(0.0),
        })
        .collect()
}
