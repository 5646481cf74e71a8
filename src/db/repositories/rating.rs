use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{prelude::*, team_ratings};
use crate::standings::leaderboard::RatingRow;

/// Repository for per-year team rating rows
pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All rating rows with the badge of the matching team attached.
    ///
    /// `team_name` is free text rather than a foreign key, so the badge
    /// lookup is a name match; ratings without a registered team simply
    /// carry no badge.
    pub async fn list_with_badges(&self) -> Result<Vec<RatingRow>> {
        let ratings = TeamRatings::find()
            .order_by_asc(team_ratings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load team ratings")?;

        let badges: HashMap<String, Option<String>> = Teams::find()
            .all(&self.conn)
            .await
            .context("Failed to load team badges")?
            .into_iter()
            .map(|t| (t.name, t.badge))
            .collect();

        Ok(ratings
            .into_iter()
            .map(|r| RatingRow {
                badge: badges.get(&r.team_name).cloned().flatten(),
                team_name: r.team_name,
                year: r.year,
                points: r.points,
            })
            .collect())
    }

    /// Atomic insert-or-update on the (team_name, year) pair. Submitting the
    /// same pair twice leaves exactly one row carrying the latest points.
    pub async fn upsert(&self, team_name: &str, year: i32, points: f64) -> Result<()> {
        let active = team_ratings::ActiveModel {
            team_name: Set(team_name.to_string()),
            year: Set(year),
            points: Set(points),
            ..Default::default()
        };

        TeamRatings::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    team_ratings::Column::TeamName,
                    team_ratings::Column::Year,
                ])
                .update_columns([team_ratings::Column::Points])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        info!("Stored rating for {} / {}: {}", team_name, year, points);
        Ok(())
    }
}
