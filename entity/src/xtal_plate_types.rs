use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "xtal_plate_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::xtal_plates::Entity")]
    XtalPlates,
    #[sea_orm(has_many = "super::xtal_plate_type_well_types::Entity")]
    XtalPlateTypeWellTypes,
}

impl Related<super::xtal_plates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalPlates.def()
    }
}

impl Related<super::xtal_well_types::Entity> for Entity {
    fn to() -> RelationDef {
        super::xtal_plate_type_well_types::Relation::XtalWellTypes.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::xtal_plate_type_well_types::Relation::XtalPlateTypes
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
