use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "xtal_plate_type_well_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub plate_type_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub well_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::xtal_plate_types::Entity",
        from = "Column::PlateTypeId",
        to = "super::xtal_plate_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    XtalPlateTypes,
    #[sea_orm(
        belongs_to = "super::xtal_well_types::Entity",
        from = "Column::WellTypeId",
        to = "super::xtal_well_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    XtalWellTypes,
}

impl Related<super::xtal_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalPlateTypes.def()
    }
}

impl Related<super::xtal_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWellTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
