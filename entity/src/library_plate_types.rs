use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "library_plate_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub rows: Option<i32>,
    pub columns: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_plates::Entity")]
    LibraryPlates,
    #[sea_orm(has_many = "super::library_plate_type_well_types::Entity")]
    LibraryPlateTypeWellTypes,
}

impl Related<super::library_plates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryPlates.def()
    }
}

// Well types are shared between plate types through the join table
impl Related<super::library_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        super::library_plate_type_well_types::Relation::LibraryWellTypes.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::library_plate_type_well_types::Relation::LibraryPlateTypes
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
