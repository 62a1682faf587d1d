use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pucks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub puck_type_id: Uuid,
    pub timestamp: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::puck_types::Entity",
        from = "Column::PuckTypeId",
        to = "super::puck_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    PuckTypes,
    #[sea_orm(has_many = "super::pins::Entity")]
    Pins,
}

impl Related<super::puck_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PuckTypes.def()
    }
}

impl Related<super::pins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
