use sea_orm_migration::prelude::*;

mod m20251002_initial;
mod m20251019_add_users;
mod m20251101_ratings_unique_pair;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251002_initial::Migration),
            Box::new(m20251019_add_users::Migration),
            Box::new(m20251101_ratings_unique_pair::Migration),
        ]
    }
}
