use parity_report::inequality::{gini_coefficient, league_inequality, season_inequality};
use parity_report::results::MatchResult;
use parity_report::retention::{
    RankedStandingRow, RetentionParams, analyze_retention, join_inequality, rank_standings,
};
use parity_report::sample_data;
use parity_report::standings::{ScoringMode, build_standings};

fn result(
    league: &str,
    season: i32,
    home: &str,
    away: &str,
    home_goals: u32,
    away_goals: u32,
) -> MatchResult {
    MatchResult {
        league: league.to_string(),
        season,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_goals,
        away_goals,
    }
}

/// Four seasons of a four-team league where A always beats B, C and D, B
/// beats C and D, and C beats D, home and away alike.
fn pecking_order_league(league: &str) -> Vec<MatchResult> {
    let teams = ["A", "B", "C", "D"];
    let mut out = Vec::new();
    for season in 14..18 {
        for (hi, home) in teams.iter().enumerate() {
            for (ai, away) in teams.iter().enumerate() {
                if hi == ai {
                    continue;
                }
                let (home_goals, away_goals) = if hi < ai { (2, 0) } else { (0, 2) };
                out.push(result(league, season, home, away, home_goals, away_goals));
            }
        }
    }
    out
}

#[test]
fn points_are_conserved_in_sum_mode() {
    let matches = sample_data::demo_dataset(5);
    let standings = build_standings(&matches, ScoringMode::Sum).unwrap();

    let expected: f64 = matches
        .iter()
        .map(|m| if m.home_goals == m.away_goals { 2.0 } else { 3.0 })
        .sum();
    let total: f64 = standings.iter().map(|r| r.points).sum();
    assert_eq!(total, expected);

    let played: u32 = standings.iter().map(|r| r.matches_played).sum();
    assert_eq!(played, 2 * matches.len() as u32);
}

#[test]
fn sum_and_mean_modes_rank_identically_on_balanced_schedules() {
    // Every demo team plays the same double round robin, so dividing by
    // matches played rescales each group by a constant.
    let matches = sample_data::demo_dataset(5);
    let sums = build_standings(&matches, ScoringMode::Sum).unwrap();
    let means = build_standings(&matches, ScoringMode::Mean).unwrap();

    let ranked_sums = rank_standings(&sums, 3);
    let ranked_means = rank_standings(&means, 3);
    let key = |rows: &[RankedStandingRow]| -> Vec<(String, i32, String, u32)> {
        rows.iter()
            .map(|r| (r.league.clone(), r.season, r.team.clone(), r.rank))
            .collect()
    };
    assert_eq!(key(&ranked_sums), key(&ranked_means));
}

#[test]
fn inequality_tables_stay_in_range_on_demo_data() {
    let matches = sample_data::demo_dataset(9);
    let standings = build_standings(&matches, ScoringMode::Mean).unwrap();

    let seasons = season_inequality(&standings);
    // Five leagues, five seasons each.
    assert_eq!(seasons.len(), 25);
    assert!(seasons.iter().all(|g| g.coefficient >= 0.0 && g.coefficient < 1.0));

    let leagues = league_inequality(&standings);
    assert_eq!(leagues.len(), 5);
    assert!(leagues.iter().all(|g| g.season.is_none()));
}

#[test]
fn retention_rates_stay_in_range_on_demo_data() {
    let matches = sample_data::demo_dataset(13);
    let standings = build_standings(&matches, ScoringMode::Mean).unwrap();
    let params = RetentionParams {
        cohort_size: 3,
        min_season: 15,
        require_adjacent_seasons: true,
    };
    let retention = analyze_retention(&standings, &params).unwrap();
    assert_eq!(retention.len(), 5);
    for league in &retention {
        // Four counted seasons with three slots each.
        assert_eq!(league.cohort_appearances, 12);
        assert!(league.repeats <= league.cohort_appearances);
        assert!((0.0..=1.0).contains(&league.retention_rate));
    }

    let summaries = join_inequality(retention, &league_inequality(&standings));
    assert_eq!(summaries.len(), 5);
}

#[test]
fn frozen_pecking_order_retains_fully_end_to_end() {
    let matches = pecking_order_league("L");
    let standings = build_standings(&matches, ScoringMode::Sum).unwrap();

    // Six matches per team per season, fully decisive.
    for row in &standings {
        assert_eq!(row.matches_played, 6);
    }
    // Twelve decisive matches per season distribute exactly three points each.
    for season in 14..18 {
        let total: f64 = standings
            .iter()
            .filter(|r| r.season == season)
            .map(|r| r.points)
            .sum();
        assert_eq!(total, 36.0);
    }

    let params = RetentionParams {
        cohort_size: 3,
        min_season: 15,
        require_adjacent_seasons: true,
    };
    let retention = analyze_retention(&standings, &params).unwrap();
    assert_eq!(retention.len(), 1);
    assert_eq!(retention[0].cohort_appearances, 9);
    assert_eq!(retention[0].retention_rate, 1.0);

    let leagues = league_inequality(&standings);
    let summaries = join_inequality(retention, &leagues);
    assert_eq!(summaries.len(), 1);
    let direct = {
        let points: Vec<f64> = standings.iter().map(|r| r.points).collect();
        gini_coefficient(&points).unwrap()
    };
    assert_eq!(summaries[0].inequality, direct);
}

#[test]
fn two_leagues_are_analyzed_independently() {
    let mut matches = pecking_order_league("L1");
    // L2 swaps its winner every season: A and B alternate at the top.
    for season in 14..18 {
        let (first, second) = if season % 2 == 0 { ("A2", "B2") } else { ("B2", "A2") };
        matches.push(result("L2", season, first, second, 2, 0));
        matches.push(result("L2", season, second, first, 0, 2));
        matches.push(result("L2", season, first, "C2", 2, 0));
        matches.push(result("L2", season, "C2", second, 0, 2));
    }

    let standings = build_standings(&matches, ScoringMode::Sum).unwrap();
    let params = RetentionParams {
        cohort_size: 1,
        min_season: 15,
        require_adjacent_seasons: true,
    };
    let retention = analyze_retention(&standings, &params).unwrap();
    assert_eq!(retention.len(), 2);

    let l1 = retention.iter().find(|r| r.league == "L1").unwrap();
    assert_eq!(l1.retention_rate, 1.0);
    let l2 = retention.iter().find(|r| r.league == "L2").unwrap();
    assert_eq!(l2.retention_rate, 0.0);
}

#[test]
fn empty_input_flows_through_as_empty_tables() {
    let standings = build_standings(&[], ScoringMode::Mean).unwrap();
    assert!(standings.is_empty());
    assert!(season_inequality(&standings).is_empty());
    let retention = analyze_retention(&standings, &RetentionParams::default()).unwrap();
    assert!(retention.is_empty());
}
