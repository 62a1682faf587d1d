use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "library_plates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub plate_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_plate_types::Entity",
        from = "Column::PlateTypeId",
        to = "super::library_plate_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    LibraryPlateTypes,
    #[sea_orm(has_many = "super::library_wells::Entity")]
    LibraryWells,
}

impl Related<super::library_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryPlateTypes.def()
    }
}

impl Related<super::library_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryWells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
