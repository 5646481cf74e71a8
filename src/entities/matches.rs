use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_a: i32,

    pub team_b: i32,

    pub score_a: i32,

    pub score_b: i32,

    pub yellow_a: i32,

    pub yellow_b: i32,

    pub red_a: i32,

    pub red_b: i32,

    pub venue: Option<String>,

    /// Kick-off date, ISO "YYYY-MM-DD".
    pub date: Option<String>,

    /// Tournament phase label (e.g. "Group Stage", "Final").
    pub stage: Option<String>,

    /// Edition year, derived from the date's leading component at write
    /// time when not supplied directly.
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamA",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TeamA,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamB",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TeamB,
    #[sea_orm(has_many = "super::match_goals::Entity")]
    MatchGoals,
}

impl Related<super::match_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchGoals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
