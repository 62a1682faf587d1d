use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A crystallization well. Harvest fields are written once, when the
/// harvest log row for this well is ingested.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "xtal_wells")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plate_id: Uuid,
    pub well_type_id: Uuid,
    pub drop_position_id: Option<Uuid>,
    pub harvesting_status: bool,
    pub sequence: i32,
    pub time_arrival: Option<NaiveDateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub harvest_comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::xtal_plates::Entity",
        from = "Column::PlateId",
        to = "super::xtal_plates::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    XtalPlates,
    #[sea_orm(
        belongs_to = "super::xtal_well_types::Entity",
        from = "Column::WellTypeId",
        to = "super::xtal_well_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    XtalWellTypes,
    #[sea_orm(
        belongs_to = "super::drop_positions::Entity",
        from = "Column::DropPositionId",
        to = "super::drop_positions::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    DropPositions,
    #[sea_orm(has_many = "super::transfers::Entity")]
    Transfers,
    #[sea_orm(has_many = "super::pins::Entity")]
    Pins,
}

impl Related<super::xtal_plates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalPlates.def()
    }
}

impl Related<super::xtal_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWellTypes.def()
    }
}

impl Related<super::drop_positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DropPositions.def()
    }
}

impl Related<super::transfers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfers.def()
    }
}

impl Related<super::pins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
