use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "xtal_plates")]
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
        belongs_to = "super::xtal_plate_types::Entity",
        from = "Column::PlateTypeId",
        to = "super::xtal_plate_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    XtalPlateTypes,
    #[sea_orm(has_many = "super::xtal_wells::Entity")]
    XtalWells,
}

impl Related<super::xtal_plate_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalPlateTypes.def()
    }
}

impl Related<super::xtal_wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::XtalWells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
