//! Win/loss/draw aggregation over stored match results.
//!
//! The functions here fold plain row values and never touch the database,
//! so the ranking rules can be exercised without a live store.

pub mod leaderboard;
pub mod scorers;

use std::cmp::Ordering;

use serde::Serialize;

/// The slice of a match row the aggregator needs to classify results.
#[derive(Debug, Clone, Copy)]
pub struct MatchScore {
    pub team_a: i32,
    pub team_b: i32,
    pub score_a: i32,
    pub score_b: i32,
}

impl From<&crate::entities::matches::Model> for MatchScore {
    fn from(m: &crate::entities::matches::Model) -> Self {
        Self {
            team_a: m.team_a,
            team_b: m.team_b,
            score_a: m.score_a,
            score_b: m.score_b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Classifies a match from one team's perspective.
///
/// Returns `None` when the team occupies neither slot; a match where both
/// slots hold the same team counts once, from the `team_a` side.
fn outcome_for(team: i32, m: &MatchScore) -> Option<Outcome> {
    let (scored, conceded) = if m.team_a == team {
        (m.score_a, m.score_b)
    } else if m.team_b == team {
        (m.score_b, m.score_a)
    } else {
        return None;
    };

    Some(match scored.cmp(&conceded) {
        Ordering::Greater => Outcome::Win,
        Ordering::Less => Outcome::Loss,
        Ordering::Equal => Outcome::Draw,
    })
}

/// Aggregated win/loss/draw record for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub total: i32,
    pub win_percent: f64,
}

/// Win percentage rounded to one decimal place; 0 for a team that has not
/// played yet.
fn win_percent(wins: i32, total: i32) -> f64 {
    if total > 0 {
        (f64::from(wins) / f64::from(total) * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Folds the match set into a record for a single team.
#[must_use]
pub fn team_record(name: &str, team_id: i32, matches: &[MatchScore]) -> TeamRecord {
    let mut record = TeamRecord {
        team: name.to_string(),
        ..TeamRecord::default()
    };

    for m in matches {
        match outcome_for(team_id, m) {
            Some(Outcome::Win) => record.wins += 1,
            Some(Outcome::Loss) => record.losses += 1,
            Some(Outcome::Draw) => record.draws += 1,
            None => continue,
        }
        record.total += 1;
    }

    record.win_percent = win_percent(record.wins, record.total);
    record
}

/// Computes the record of every registered team and orders the table by win
/// percentage descending, team name ascending on ties.
///
/// Teams without a single match stay in the table with zeroed counters.
#[must_use]
pub fn performance_table(teams: &[(i32, String)], matches: &[MatchScore]) -> Vec<TeamRecord> {
    let mut table: Vec<TeamRecord> = teams
        .iter()
        .map(|(id, name)| team_record(name, *id, matches))
        .collect();

    table.sort_by(|a, b| {
        b.win_percent
            .total_cmp(&a.win_percent)
            .then_with(|| a.team.cmp(&b.team))
    });

    table
}
