use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "library_well_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_wells::Entity")]
    LibraryWells,
    #[sea_orm(has_many = "super::library_plate_type_well_types::Entity")]
    LibraryPlateTypeWellTypes,
}

impl Related<super::library_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryWells.def()
    }
}

impl Related<super::library_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        super::library_plate_type_well_types::Relation::LibraryPlateTypes.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::library_plate_type_well_types::Relation::LibraryWellTypes
                .def()
                .rev(),
        )
    }
}

impl Related<super::library_plate_type_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryPlateTypeWellTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
