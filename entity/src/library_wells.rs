use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A compound-holding source well. `sequence` is allocated per plate when the
/// well is inserted and never changes afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "library_wells")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plate_id: Uuid,
    pub well_type_id: Uuid,
    pub used: bool,
    pub catalog_id: String,
    #[sea_orm(column_type = "Text")]
    pub smiles: String,
    pub sequence: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_plates::Entity",
        from = "Column::PlateId",
        to = "super::library_plates::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    LibraryPlates,
    #[sea_orm(
        belongs_to = "super::library_well_types::Entity",
        from = "Column::WellTypeId",
        to = "super::library_well_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    LibraryWellTypes,
    #[sea_orm(has_many = "super::transfers::Entity")]
    Transfers,
}

impl Related<super::library_plates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryPlates.def()
    }
}

impl Related<super::library_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryWellTypes.def()
    }
}

impl Related<super::transfers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
