//! NFL bye-week schedule.

use std::collections::HashMap;

/// Teams on bye, keyed by week.
#[derive(Debug, Clone, Default)]
pub struct ByeSchedule {
    byes: HashMap<u32, Vec<&'static str>>,
}

impl ByeSchedule {
    /// 2025 regular-season bye weeks.
    pub fn nfl_2025() -> Self {
        let byes = HashMap::from([
            (5, vec!["ATL", "CHI", "GB", "PIT"]),
            (6, vec!["CIN", "CLE", "HOU", "NYG"]),
            (7, vec!["DAL", "DEN", "KC", "LAC"]),
            (8, vec!["ARI", "DET", "JAX", "LV", "LAR", "SEA"]),
            (9, vec!["BAL", "MIA", "MIN", "PHI"]),
            (10, vec!["BUF", "CAR", "IND", "NE"]),
            (11, vec!["NO", "NYJ", "SF", "TB"]),
            (12, vec!["TEN", "WAS"]),
            (14, vec![]),
        ]);
        Self { byes }
    }

    pub fn is_on_bye(&self, team: &str, week: u32) -> bool {
        self.byes
            .get(&week)
            .is_some_and(|teams| teams.iter().any(|t| t.eq_ignore_ascii_case(team)))
    }

    pub fn teams_on_bye(&self, week: u32) -> &[&'static str] {
        self.byes.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }
}
