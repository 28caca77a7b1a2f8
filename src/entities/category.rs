use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_category::Entity")]
    GameCategories,
}

impl Related<super::game_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameCategories.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_category::Relation::Game.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
