use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{prelude::*, team_ratings, teams};

/// Field changes accepted by a team update; `None` leaves optional columns
/// cleared, matching the admin form which always posts the full row.
#[derive(Debug, Clone)]
pub struct TeamUpdate {
    pub name: String,
    pub coach: Option<String>,
    pub group_name: Option<String>,
    pub year_established: Option<i32>,
    pub badge: Option<String>,
}

/// Repository for team rows
pub struct TeamRepository {
    conn: DatabaseConnection,
}

impl TeamRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<teams::Model>> {
        let rows = Teams::find()
            .order_by_asc(teams::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list teams")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<teams::Model>> {
        let team = Teams::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query team by id")?;

        Ok(team)
    }

    pub async fn add(&self, name: &str, group_name: Option<&str>) -> Result<teams::Model> {
        let active = teams::ActiveModel {
            name: Set(name.to_string()),
            group_name: Set(group_name.map(str::to_string)),
            ..Default::default()
        };

        let team = active.insert(&self.conn).await?;
        Ok(team)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<teams::Model>> {
        let team = Teams::find()
            .filter(teams::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query team by name")?;

        Ok(team)
    }

    /// Registers a team (if the name is new) and records its rating for the
    /// given year in one transaction, so a failure mid-way leaves no
    /// half-written state.
    ///
    /// The rating write is a single `ON CONFLICT (team_name, year) DO
    /// UPDATE`, so re-submitting the same pair only moves the points value.
    pub async fn register_with_rating(
        &self,
        name: &str,
        badge: Option<&str>,
        year: i32,
        points: f64,
    ) -> Result<(teams::Model, bool)> {
        let txn = self.conn.begin().await?;

        let existing = Teams::find()
            .filter(teams::Column::Name.eq(name))
            .one(&txn)
            .await?;
        let created = existing.is_none();

        let team = match existing {
            Some(team) => team,
            None => {
                let active = teams::ActiveModel {
                    name: Set(name.to_string()),
                    badge: Set(badge.map(str::to_string)),
                    ..Default::default()
                };
                active.insert(&txn).await?
            }
        };

        let rating = team_ratings::ActiveModel {
            team_name: Set(name.to_string()),
            year: Set(year),
            points: Set(points),
            ..Default::default()
        };
        TeamRatings::insert(rating)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    team_ratings::Column::TeamName,
                    team_ratings::Column::Year,
                ])
                .update_columns([team_ratings::Column::Points])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        if created {
            info!("Registered team {} with {} rating for {}", name, points, year);
        }
        Ok((team, created))
    }

    pub async fn update(&self, id: i32, changes: TeamUpdate) -> Result<Option<teams::Model>> {
        let Some(team) = Teams::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query team for update")?
        else {
            return Ok(None);
        };

        let mut active: teams::ActiveModel = team.into();
        active.name = Set(changes.name);
        active.coach = Set(changes.coach);
        active.group_name = Set(changes.group_name);
        active.year_established = Set(changes.year_established);
        if changes.badge.is_some() {
            active.badge = Set(changes.badge);
        }
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    pub async fn set_badge(&self, id: i32, badge_path: &str) -> Result<bool> {
        let result = Teams::update_many()
            .col_expr(
                teams::Column::Badge,
                sea_orm::sea_query::Expr::value(badge_path),
            )
            .filter(teams::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Teams::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
