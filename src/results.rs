use serde::{Deserialize, Serialize};

pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub league: String,
    pub season: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchResult {
    pub fn points(&self) -> (u32, u32) {
        match_points(self.home_goals, self.away_goals)
    }

    // Applied at the ingestion boundary and again by the standings builder.
    pub fn validate(&self) -> Result<(), String> {
        if self.league.trim().is_empty() {
            return Err("missing league identifier".to_string());
        }
        if self.home_team.trim().is_empty() {
            return Err("missing home team identifier".to_string());
        }
        if self.away_team.trim().is_empty() {
            return Err("missing away team identifier".to_string());
        }
        if self.home_team == self.away_team {
            return Err(format!("team {} listed on both sides", self.home_team));
        }
        Ok(())
    }
}

pub fn match_points(home_goals: u32, away_goals: u32) -> (u32, u32) {
    if home_goals > away_goals {
        (WIN_POINTS, 0)
    } else if home_goals < away_goals {
        (0, WIN_POINTS)
    } else {
        (DRAW_POINTS, DRAW_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(home_goals: u32, away_goals: u32) -> MatchResult {
        MatchResult {
            league: "E0".to_string(),
            season: 15,
            home_team: "E001".to_string(),
            away_team: "E002".to_string(),
            home_goals,
            away_goals,
        }
    }

    #[test]
    fn home_win_pays_three_to_home() {
        assert_eq!(match_points(2, 0), (3, 0));
    }

    #[test]
    fn away_win_pays_three_to_away() {
        assert_eq!(match_points(0, 1), (0, 3));
    }

    #[test]
    fn draw_pays_one_each() {
        assert_eq!(match_points(2, 2), (1, 1));
        assert_eq!(match_points(0, 0), (1, 1));
    }

    #[test]
    fn points_method_matches_free_function() {
        let m = result(3, 1);
        assert_eq!(m.points(), match_points(3, 1));
    }

    #[test]
    fn validate_rejects_blank_identifiers() {
        let mut m = result(1, 0);
        m.league = "  ".to_string();
        assert!(m.validate().is_err());

        let mut m = result(1, 0);
        m.home_team = String::new();
        assert!(m.validate().is_err());

        let mut m = result(1, 0);
        m.away_team = String::new();
        assert!(m.validate().is_err());
    }

    #[test]
    fn validate_rejects_self_play() {
        let mut m = result(1, 0);
        m.away_team = m.home_team.clone();
        assert!(m.validate().is_err());
    }

    #[test]
    fn validate_accepts_normal_record() {
        assert!(result(0, 0).validate().is_ok());
    }
}
