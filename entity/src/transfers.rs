use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One nanoliter dispense from a library well into a crystal well.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub from_well_id: Uuid,
    #[sea_orm(unique)]
    pub to_well_id: Uuid,
    pub transfer_volume: i32,
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Batches,
    #[sea_orm(
        belongs_to = "super::library_wells::Entity",
        from = "Column::FromWellId",
        to = "super::library_wells::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    LibraryWells,
    #[sea_orm(
        belongs_to = "super::xtal_wells::Entity",
        from = "Column::ToWellId",
        to = "super::xtal_wells::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    XtalWells,
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::library_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryWells.def()
    }
}

impl Related<super::xtal_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
