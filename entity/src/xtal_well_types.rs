use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named by shifter coordinate (`A1a`); each type carries exactly one map.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "xtal_well_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub well_map_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::well_maps::Entity",
        from = "Column::WellMapId",
        to = "super::well_maps::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    WellMaps,
    #[sea_orm(has_many = "super::xtal_wells::Entity")]
    XtalWells,
    #[sea_orm(has_many = "super::xtal_plate_type_well_types::Entity")]
    XtalPlateTypeWellTypes,
}

impl Related<super::well_maps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WellMaps.def()
    }
}

impl Related<super::xtal_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWells.def()
    }
}

impl Related<super::xtal_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        super::xtal_plate_type_well_types::Relation::XtalPlateTypes.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::xtal_plate_type_well_types::Relation::XtalWellTypes
                .def()
                .rev(),
        )
    }
}

impl Related<super::xtal_plate_type_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalPlateTypeWellTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
