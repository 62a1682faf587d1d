use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "library_plate_type_well_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub plate_type_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub well_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_plate_types::Entity",
        from = "Column::PlateTypeId",
        to = "super::library_plate_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LibraryPlateTypes,
    #[sea_orm(
        belongs_to = "super::library_well_types::Entity",
        from = "Column::WellTypeId",
        to = "super::library_well_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LibraryWellTypes,
}

impl Related<super::library_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryPlateTypes.def()
    }
}

impl Related<super::library_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryWellTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
