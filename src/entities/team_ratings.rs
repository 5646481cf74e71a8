use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "team_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Free-text team name; intentionally not a foreign key so ratings can
    /// predate the team's registration.
    pub team_name: String,

    pub year: i32,

    pub points: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
