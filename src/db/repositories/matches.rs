use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{match_goals, matches, prelude::*};
use crate::standings::scorers::{GoalContribution, partition_scorers};

/// Fields posted when recording a match fixture.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub team_a: i32,
    pub team_b: i32,
    pub score_a: i32,
    pub score_b: i32,
    pub yellow_a: i32,
    pub yellow_b: i32,
    pub red_a: i32,
    pub red_b: i32,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub stage: Option<String>,
    pub year: Option<i32>,
}

/// One goal-scorer line attached to a new match.
#[derive(Debug, Clone, Copy)]
pub struct ScorerEntry {
    pub player_id: i32,
    pub goals: i32,
}

/// Fields the match edit form can change.
#[derive(Debug, Clone)]
pub struct MatchUpdate {
    pub team_a: i32,
    pub team_b: i32,
    pub score_a: i32,
    pub score_b: i32,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub stage: Option<String>,
}

/// A match row composed for display: resolved team names plus the
/// per-side scorer lists.
#[derive(Debug, Clone)]
pub struct MatchDetail {
    pub row: matches::Model,
    pub team_a_name: String,
    pub team_b_name: String,
    pub team_a_scorers: Vec<String>,
    pub team_b_scorers: Vec<String>,
}

fn year_from_date(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.split('-').next())
        .and_then(|y| y.parse().ok())
}

/// Edition year for a match: explicit value first, otherwise the leading
/// component of the date, otherwise the current tournament default.
fn derive_year(date: Option<&str>, year: Option<i32>) -> i32 {
    year.or_else(|| year_from_date(date)).unwrap_or(2025)
}

/// Repository for match and match-goal rows
pub struct MatchRepository {
    conn: DatabaseConnection,
}

impl MatchRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<matches::Model>> {
        let row = Matches::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query match by id")?;

        Ok(row)
    }

    /// All years that have at least one fixture, newest first.
    pub async fn distinct_years(&self) -> Result<Vec<i32>> {
        let years: Vec<i32> = Matches::find()
            .select_only()
            .column(matches::Column::Year)
            .distinct()
            .order_by_desc(matches::Column::Year)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query match years")?;

        Ok(years)
    }

    /// Matches filtered by optional year and stage (AND-combined), newest
    /// first, with team names resolved and scorer lists partitioned per
    /// side.
    pub async fn list_detailed(
        &self,
        year: Option<i32>,
        stage: Option<&str>,
    ) -> Result<Vec<MatchDetail>> {
        let mut query = Matches::find().order_by_desc(matches::Column::Date);
        if let Some(year) = year {
            query = query.filter(matches::Column::Year.eq(year));
        }
        if let Some(stage) = stage {
            query = query.filter(matches::Column::Stage.eq(stage));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list matches")?;

        let team_names: HashMap<i32, String> = Teams::find()
            .all(&self.conn)
            .await
            .context("Failed to load team names")?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        let match_ids: Vec<i32> = rows.iter().map(|m| m.id).collect();
        let mut goals_by_match = self.goals_for_matches(&match_ids).await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            // A fixture whose team rows were deleted has no display names;
            // it is skipped, like the inner join the page was built on.
            let (Some(team_a_name), Some(team_b_name)) =
                (team_names.get(&row.team_a), team_names.get(&row.team_b))
            else {
                continue;
            };

            let goals = goals_by_match.remove(&row.id).unwrap_or_default();
            let (team_a_scorers, team_b_scorers) =
                partition_scorers(row.team_a, row.team_b, &goals);

            details.push(MatchDetail {
                team_a_name: team_a_name.clone(),
                team_b_name: team_b_name.clone(),
                team_a_scorers,
                team_b_scorers,
                row,
            });
        }

        Ok(details)
    }

    /// Records a match and its goal scorers in one transaction.
    pub async fn add_with_scorers(
        &self,
        new: NewMatch,
        scorers: &[ScorerEntry],
    ) -> Result<matches::Model> {
        let year = derive_year(new.date.as_deref(), new.year);

        let txn = self.conn.begin().await?;

        let active = matches::ActiveModel {
            team_a: Set(new.team_a),
            team_b: Set(new.team_b),
            score_a: Set(new.score_a),
            score_b: Set(new.score_b),
            yellow_a: Set(new.yellow_a),
            yellow_b: Set(new.yellow_b),
            red_a: Set(new.red_a),
            red_b: Set(new.red_b),
            venue: Set(new.venue),
            date: Set(new.date),
            stage: Set(new.stage),
            year: Set(year),
            ..Default::default()
        };
        let row = active.insert(&txn).await?;

        for scorer in scorers {
            let goal = match_goals::ActiveModel {
                match_id: Set(row.id),
                player_id: Set(scorer.player_id),
                goals_scored: Set(scorer.goals),
                ..Default::default()
            };
            goal.insert(&txn).await?;
        }

        txn.commit().await?;

        info!("Recorded match {} with {} scorer entries", row.id, scorers.len());
        Ok(row)
    }

    pub async fn update(&self, id: i32, changes: MatchUpdate) -> Result<Option<matches::Model>> {
        let Some(row) = Matches::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query match for update")?
        else {
            return Ok(None);
        };

        // A moved fixture keeps its year unless the new date says otherwise.
        let year = year_from_date(changes.date.as_deref()).unwrap_or(row.year);

        let mut active: matches::ActiveModel = row.into();
        active.team_a = Set(changes.team_a);
        active.team_b = Set(changes.team_b);
        active.score_a = Set(changes.score_a);
        active.score_b = Set(changes.score_b);
        active.venue = Set(changes.venue);
        active.date = Set(changes.date);
        active.stage = Set(changes.stage);
        active.year = Set(year);
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Matches::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// All match rows, for the performance aggregation.
    pub async fn list_all(&self) -> Result<Vec<matches::Model>> {
        let rows = Matches::find()
            .all(&self.conn)
            .await
            .context("Failed to load matches")?;

        Ok(rows)
    }

    async fn goals_for_matches(
        &self,
        match_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<GoalContribution>>> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = MatchGoals::find()
            .filter(match_goals::Column::MatchId.is_in(match_ids.iter().copied()))
            .find_also_related(Players)
            .all(&self.conn)
            .await
            .context("Failed to load goal scorers")?;

        let mut by_match: HashMap<i32, Vec<GoalContribution>> = HashMap::new();
        for (goal, player) in rows {
            // Goal rows whose player was deleted have nobody to display.
            let Some(player) = player else { continue };
            by_match
                .entry(goal.match_id)
                .or_default()
                .push(GoalContribution {
                    player_name: player.name,
                    player_team: player.team_id,
                    goals: goal.goals_scored,
                });
        }

        Ok(by_match)
    }
}

#[cfg(test)]
mod tests {
    use super::derive_year;

    #[test]
    fn year_prefers_the_explicit_value() {
        assert_eq!(derive_year(Some("2024-10-01"), Some(2023)), 2023);
    }

    #[test]
    fn year_falls_back_to_the_date_prefix() {
        assert_eq!(derive_year(Some("2024-10-01"), None), 2024);
    }

    #[test]
    fn year_defaults_when_nothing_is_given() {
        assert_eq!(derive_year(None, None), 2025);
        assert_eq!(derive_year(Some("not-a-date"), None), 2025);
    }
}
