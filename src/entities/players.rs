use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub team_id: i32,

    /// Career goal counter, maintained by admin edits independently of
    /// `match_goals` rows.
    pub goals: i32,

    pub yellow_cards: i32,

    pub red_cards: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Teams,
    #[sea_orm(has_many = "super::match_goals::Entity")]
    MatchGoals,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::match_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchGoals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
