//! Per-side scorer lists for the match detail view.

/// A goal contribution joined to the scoring player's name and team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalContribution {
    pub player_name: String,
    pub player_team: i32,
    pub goals: i32,
}

/// Splits "name (goals)" display strings between the two sides of a match.
///
/// Contributions from players on neither roster are dropped from both lists;
/// stale `match_goals` rows must not break the page.
#[must_use]
pub fn partition_scorers(
    team_a: i32,
    team_b: i32,
    goals: &[GoalContribution],
) -> (Vec<String>, Vec<String>) {
    let mut side_a = Vec::new();
    let mut side_b = Vec::new();

    for g in goals {
        let label = format!("{} ({})", g.player_name, g.goals);
        if g.player_team == team_a {
            side_a.push(label);
        } else if g.player_team == team_b {
            side_b.push(label);
        }
    }

    (side_a, side_b)
}
