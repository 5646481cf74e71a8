use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{players, prelude::*, teams};

/// A player row joined with the owning team's name for the admin roster.
#[derive(Debug, Clone)]
pub struct PlayerWithTeam {
    pub player: players::Model,
    pub team_name: Option<String>,
}

/// Counter updates posted by the player edit form; name and team move too
/// when the form changes them.
#[derive(Debug, Clone)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub team_id: Option<i32>,
    pub goals: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
}

/// Repository for player rows
pub struct PlayerRepository {
    conn: DatabaseConnection,
}

impl PlayerRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_with_teams(&self) -> Result<Vec<PlayerWithTeam>> {
        let rows = Players::find()
            .order_by_asc(players::Column::Id)
            .find_also_related(Teams)
            .all(&self.conn)
            .await
            .context("Failed to list players")?;

        Ok(rows
            .into_iter()
            .map(|(player, team)| PlayerWithTeam {
                player,
                team_name: team.map(|t| t.name),
            })
            .collect())
    }

    pub async fn list_for_team(&self, team_id: i32) -> Result<Vec<players::Model>> {
        let rows = Players::find()
            .filter(players::Column::TeamId.eq(team_id))
            .order_by_asc(players::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list players for team")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<players::Model>> {
        let player = Players::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query player by id")?;

        Ok(player)
    }

    pub async fn add(
        &self,
        name: &str,
        team_id: i32,
        goals: i32,
        yellow_cards: i32,
        red_cards: i32,
    ) -> Result<players::Model> {
        let active = players::ActiveModel {
            name: Set(name.to_string()),
            team_id: Set(team_id),
            goals: Set(goals),
            yellow_cards: Set(yellow_cards),
            red_cards: Set(red_cards),
            ..Default::default()
        };

        let player = active.insert(&self.conn).await?;
        Ok(player)
    }

    pub async fn update(&self, id: i32, changes: PlayerUpdate) -> Result<Option<players::Model>> {
        let Some(player) = Players::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query player for update")?
        else {
            return Ok(None);
        };

        let mut active: players::ActiveModel = player.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(team_id) = changes.team_id {
            active.team_id = Set(team_id);
        }
        active.goals = Set(changes.goals);
        active.yellow_cards = Set(changes.yellow_cards);
        active.red_cards = Set(changes.red_cards);
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Players::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
