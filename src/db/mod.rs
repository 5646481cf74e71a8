use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{matches, players, teams};
use crate::standings::leaderboard::RatingRow;

pub mod migrator;
pub mod repositories;

pub use repositories::matches::{MatchDetail, MatchUpdate, NewMatch, ScorerEntry};
pub use repositories::player::{PlayerUpdate, PlayerWithTeam};
pub use repositories::team::TeamUpdate;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn team_repo(&self) -> repositories::team::TeamRepository {
        repositories::team::TeamRepository::new(self.conn.clone())
    }

    fn player_repo(&self) -> repositories::player::PlayerRepository {
        repositories::player::PlayerRepository::new(self.conn.clone())
    }

    fn match_repo(&self) -> repositories::matches::MatchRepository {
        repositories::matches::MatchRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Teams ==========

    pub async fn list_teams(&self) -> Result<Vec<teams::Model>> {
        self.team_repo().list_all().await
    }

    pub async fn get_team(&self, id: i32) -> Result<Option<teams::Model>> {
        self.team_repo().get(id).await
    }

    pub async fn add_team(&self, name: &str, group_name: Option<&str>) -> Result<teams::Model> {
        self.team_repo().add(name, group_name).await
    }

    pub async fn get_team_by_name(&self, name: &str) -> Result<Option<teams::Model>> {
        self.team_repo().get_by_name(name).await
    }

    pub async fn register_team_with_rating(
        &self,
        name: &str,
        badge: Option<&str>,
        year: i32,
        points: f64,
    ) -> Result<(teams::Model, bool)> {
        self.team_repo()
            .register_with_rating(name, badge, year, points)
            .await
    }

    pub async fn update_team(&self, id: i32, changes: TeamUpdate) -> Result<Option<teams::Model>> {
        self.team_repo().update(id, changes).await
    }

    pub async fn set_team_badge(&self, id: i32, badge_path: &str) -> Result<bool> {
        self.team_repo().set_badge(id, badge_path).await
    }

    pub async fn remove_team(&self, id: i32) -> Result<bool> {
        self.team_repo().remove(id).await
    }

    // ========== Players ==========

    pub async fn list_players_with_teams(&self) -> Result<Vec<PlayerWithTeam>> {
        self.player_repo().list_with_teams().await
    }

    pub async fn list_players_for_team(&self, team_id: i32) -> Result<Vec<players::Model>> {
        self.player_repo().list_for_team(team_id).await
    }

    pub async fn get_player(&self, id: i32) -> Result<Option<players::Model>> {
        self.player_repo().get(id).await
    }

    pub async fn add_player(
        &self,
        name: &str,
        team_id: i32,
        goals: i32,
        yellow_cards: i32,
        red_cards: i32,
    ) -> Result<players::Model> {
        self.player_repo()
            .add(name, team_id, goals, yellow_cards, red_cards)
            .await
    }

    pub async fn update_player(
        &self,
        id: i32,
        changes: PlayerUpdate,
    ) -> Result<Option<players::Model>> {
        self.player_repo().update(id, changes).await
    }

    pub async fn remove_player(&self, id: i32) -> Result<bool> {
        self.player_repo().remove(id).await
    }

    // ========== Matches ==========

    pub async fn get_match(&self, id: i32) -> Result<Option<matches::Model>> {
        self.match_repo().get(id).await
    }

    pub async fn list_matches_detailed(
        &self,
        year: Option<i32>,
        stage: Option<&str>,
    ) -> Result<Vec<MatchDetail>> {
        self.match_repo().list_detailed(year, stage).await
    }

    pub async fn list_all_matches(&self) -> Result<Vec<matches::Model>> {
        self.match_repo().list_all().await
    }

    pub async fn match_years(&self) -> Result<Vec<i32>> {
        self.match_repo().distinct_years().await
    }

    pub async fn add_match_with_scorers(
        &self,
        new: NewMatch,
        scorers: &[ScorerEntry],
    ) -> Result<matches::Model> {
        self.match_repo().add_with_scorers(new, scorers).await
    }

    pub async fn update_match(
        &self,
        id: i32,
        changes: MatchUpdate,
    ) -> Result<Option<matches::Model>> {
        self.match_repo().update(id, changes).await
    }

    pub async fn remove_match(&self, id: i32) -> Result<bool> {
        self.match_repo().remove(id).await
    }

    // ========== Ratings ==========

    pub async fn list_ratings_with_badges(&self) -> Result<Vec<RatingRow>> {
        self.rating_repo().list_with_badges().await
    }

    pub async fn upsert_rating(&self, team_name: &str, year: i32, points: f64) -> Result<()> {
        self.rating_repo().upsert(team_name, year, points).await
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(&self, username: &str, new_password: &str) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, username: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(username).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }
}
