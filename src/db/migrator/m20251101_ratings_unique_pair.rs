use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Concurrent submits of the same (team_name, year) pair used to be
        // able to slip in duplicate rows; collapse them to the newest before
        // the unique index lands.
        conn.execute_unprepared(
            "DELETE FROM team_ratings WHERE id NOT IN (SELECT MAX(id) FROM team_ratings GROUP BY team_name, year)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_team_ratings_name_year ON team_ratings(team_name, year)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_team_ratings_name_year")
            .await?;

        Ok(())
    }
}
