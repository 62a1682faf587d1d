use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Geometry of one crystal well position: a micron offset plus the echo and
/// shifter names of the same physical spot.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "well_maps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub well_pos_x: i32,
    pub well_pos_y: i32,
    pub echo: String,
    pub shifter: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::xtal_well_types::Entity")]
    XtalWellTypes,
}

impl Related<super::xtal_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWellTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
