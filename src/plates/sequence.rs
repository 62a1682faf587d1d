//! Per-plate well numbering.
//!
//! Each new well receives `1 + max(sequence)` of its plate, or 1 for the first
//! well. The read and the insert share one transaction, and on PostgreSQL the
//! plate row is locked first so concurrent writers on the same plate queue up.
//! The `(plate_id, sequence)` unique index rejects anything that slips past.

use crate::common::errors::{DbErrorExt, TrackingResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseBackend,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;
use xtal_entity::{library_plates, library_wells, xtal_plates, xtal_wells};

fn locks_rows(txn: &DatabaseTransaction) -> bool {
    txn.get_database_backend() == DatabaseBackend::Postgres
}

pub async fn next_library_sequence(txn: &DatabaseTransaction, plate_id: Uuid) -> TrackingResult<i32> {
    let mut plate = library_plates::Entity::find_by_id(plate_id);
    if locks_rows(txn) {
        plate = plate.lock_exclusive();
    }
    plate
        .one(txn)
        .await?
        .ok_or_else(|| crate::not_found!("library plate", plate_id))?;

    let last = library_wells::Entity::find()
        .filter(library_wells::Column::PlateId.eq(plate_id))
        .order_by_desc(library_wells::Column::Sequence)
        .one(txn)
        .await?;
    Ok(last.map_or(1, |well| well.sequence + 1))
}

pub async fn next_xtal_sequence(txn: &DatabaseTransaction, plate_id: Uuid) -> TrackingResult<i32> {
    let mut plate = xtal_plates::Entity::find_by_id(plate_id);
    if locks_rows(txn) {
        plate = plate.lock_exclusive();
    }
    plate
        .one(txn)
        .await?
        .ok_or_else(|| crate::not_found!("xtal plate", plate_id))?;

    let last = xtal_wells::Entity::find()
        .filter(xtal_wells::Column::PlateId.eq(plate_id))
        .order_by_desc(xtal_wells::Column::Sequence)
        .one(txn)
        .await?;
    Ok(last.map_or(1, |well| well.sequence + 1))
}

#[derive(Debug, Clone)]
pub struct NewLibraryWell {
    pub plate_id: Uuid,
    pub well_type_id: Uuid,
    pub catalog_id: String,
    pub smiles: String,
}

pub async fn insert_library_well(
    txn: &DatabaseTransaction,
    well: NewLibraryWell,
) -> TrackingResult<library_wells::Model> {
    let sequence = next_library_sequence(txn, well.plate_id).await?;
    library_wells::ActiveModel {
        id: Set(Uuid::new_v4()),
        plate_id: Set(well.plate_id),
        well_type_id: Set(well.well_type_id),
        used: Set(false),
        catalog_id: Set(well.catalog_id),
        smiles: Set(well.smiles),
        sequence: Set(sequence),
    }
    .insert(txn)
    .await
    .map_err(|e| e.to_tracking_error("library_wells"))
}

pub async fn insert_xtal_well(
    txn: &DatabaseTransaction,
    plate_id: Uuid,
    well_type_id: Uuid,
    drop_position_id: Option<Uuid>,
) -> TrackingResult<xtal_wells::Model> {
    let sequence = next_xtal_sequence(txn, plate_id).await?;
    xtal_wells::ActiveModel {
        id: Set(Uuid::new_v4()),
        plate_id: Set(plate_id),
        well_type_id: Set(well_type_id),
        drop_position_id: Set(drop_position_id),
        harvesting_status: Set(false),
        sequence: Set(sequence),
        time_arrival: Set(None),
        harvest_comment: Set(None),
    }
    .insert(txn)
    .await
    .map_err(|e| e.to_tracking_error("xtal_wells"))
}
