use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "drop_positions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub x_offset: i32,
    pub y_offset: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::xtal_wells::Entity")]
    XtalWells,
}

impl Related<super::xtal_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
