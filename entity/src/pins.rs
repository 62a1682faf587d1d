use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum XrayStatus {
    #[sea_orm(string_value = "not_collected")]
    NotCollected,
    #[sea_orm(string_value = "collection_succeeded")]
    CollectionSucceeded,
    #[sea_orm(string_value = "collection_failed")]
    CollectionFailed,
}

/// A harvested crystal mounted in a puck slot. At most one pin per crystal
/// well; pins are never updated after creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub puck_id: Uuid,
    pub position: i32,
    #[sea_orm(unique)]
    pub xtal_well_id: Uuid,
    pub time_departure: Option<NaiveDateTime>,
    pub pick_duration: Option<String>,
    pub xray_status: XrayStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pucks::Entity",
        from = "Column::PuckId",
        to = "super::pucks::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Pucks,
    #[sea_orm(
        belongs_to = "super::xtal_wells::Entity",
        from = "Column::XtalWellId",
        to = "super::xtal_wells::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    XtalWells,
}

impl Related<super::pucks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pucks.def()
    }
}

impl Related<super::xtal_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
