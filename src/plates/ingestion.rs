//! Creates plates and their wells from uploaded files. Wells are inserted in
//! file order, so the file order becomes the sequence order.

use super::models::{PlateIngestionReport, PlateSummary};
use super::pools::{available_library_wells, available_xtal_wells};
use super::sequence::{NewLibraryWell, insert_library_well, insert_xtal_well};
use crate::common::errors::{DbErrorExt, TrackingResult};
use crate::common::models::SkippedRow;
use crate::geometry::services::resolve_drop_position;
use crate::services::log_reader::{LibraryRow, LogTable};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;
use xtal_entity::{
    library_plate_type_well_types, library_plate_types, library_plates, library_well_types,
    library_wells, xtal_plate_type_well_types, xtal_plate_types, xtal_plates, xtal_well_types,
    xtal_wells,
};

pub const IMAGING_COLUMNS: [&str; 4] = ["PlateID", "PlateRow", "PlateColumn", "PositionSubWell"];

/// Well type name to id for every well type of a library plate type
async fn library_well_type_ids<C: ConnectionTrait>(
    db: &C,
    plate_type_id: Uuid,
) -> TrackingResult<HashMap<String, Uuid>> {
    let ids: Vec<Uuid> = library_plate_type_well_types::Entity::find()
        .filter(library_plate_type_well_types::Column::PlateTypeId.eq(plate_type_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.well_type_id)
        .collect();
    Ok(library_well_types::Entity::find()
        .filter(library_well_types::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|well_type| (well_type.name, well_type.id))
        .collect())
}

async fn xtal_well_type_ids<C: ConnectionTrait>(
    db: &C,
    plate_type_id: Uuid,
) -> TrackingResult<HashMap<String, Uuid>> {
    let ids: Vec<Uuid> = xtal_plate_type_well_types::Entity::find()
        .filter(xtal_plate_type_well_types::Column::PlateTypeId.eq(plate_type_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.well_type_id)
        .collect();
    Ok(xtal_well_types::Entity::find()
        .filter(xtal_well_types::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|well_type| (well_type.name, well_type.id))
        .collect())
}

pub async fn create_library_plate(
    db: &DatabaseConnection,
    plate_name: &str,
    plate_type_name: &str,
    rows: Vec<LibraryRow>,
) -> TrackingResult<PlateIngestionReport> {
    let txn = db.begin().await?;

    let plate_type = library_plate_types::Entity::find()
        .filter(library_plate_types::Column::Name.eq(plate_type_name))
        .one(&txn)
        .await?
        .ok_or_else(|| crate::not_found!("library plate type", plate_type_name))?;
    let well_types = library_well_type_ids(&txn, plate_type.id).await?;

    let plate = library_plates::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(plate_name.to_string()),
        plate_type_id: Set(plate_type.id),
    }
    .insert(&txn)
    .await
    .map_err(|e| e.to_tracking_error("library_plates"))?;

    let mut skipped = Vec::new();
    let mut wells_created = 0;
    for (index, row) in rows.into_iter().enumerate() {
        let Some(&well_type_id) = well_types.get(&row.well) else {
            tracing::warn!(
                plate = %plate.name,
                row = index,
                well = %row.well,
                "No matching library well type, skipping row"
            );
            skipped.push(SkippedRow {
                row: index,
                reason: format!("well '{}' is not part of plate type {}", row.well, plate_type.name),
            });
            continue;
        };

        insert_library_well(
            &txn,
            NewLibraryWell {
                plate_id: plate.id,
                well_type_id,
                catalog_id: row.catalog_id,
                smiles: row.smiles,
            },
        )
        .await?;
        wells_created += 1;
    }

    txn.commit().await?;
    tracing::info!(plate = %plate.name, wells_created, skipped = skipped.len(), "Created library plate");

    Ok(PlateIngestionReport {
        plate: library_plate_summary(db, plate, plate_type.name).await?,
        wells_created,
        skipped,
    })
}

/// Builds a crystal plate from an imaging log. The log must describe exactly
/// one plate. An unknown drop-zone code rolls the whole import back.
pub async fn create_xtal_plate(
    db: &DatabaseConnection,
    plate_type_name: Option<&str>,
    table: &LogTable,
) -> TrackingResult<PlateIngestionReport> {
    table
        .require_columns(&IMAGING_COLUMNS)
        .map_err(|e| crate::input_shape_error!("file", e))?;

    let plate_ids = table.distinct("PlateID");
    let [plate_name] = plate_ids.as_slice() else {
        return Err(crate::input_shape_error!(
            "PlateID",
            format!("expected exactly one plate per imaging log, found {}", plate_ids.len())
        ));
    };

    let plate_type_name = match plate_type_name {
        Some(name) => name.to_string(),
        None => table.distinct("PlateType").into_iter().next().ok_or_else(|| {
            crate::input_shape_error!("plate_type", "not given and not present in the log")
        })?,
    };

    let txn = db.begin().await?;

    let plate_type = xtal_plate_types::Entity::find()
        .filter(xtal_plate_types::Column::Name.eq(plate_type_name.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| crate::not_found!("xtal plate type", plate_type_name))?;
    let well_types = xtal_well_type_ids(&txn, plate_type.id).await?;

    let plate = xtal_plates::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(plate_name.clone()),
        plate_type_id: Set(plate_type.id),
    }
    .insert(&txn)
    .await
    .map_err(|e| e.to_tracking_error("xtal_plates"))?;

    let mut skipped = Vec::new();
    let mut wells_created = 0;
    for row in &table.rows {
        let position = format!(
            "{}{}{}",
            row.get("PlateRow").unwrap_or_default(),
            row.get("PlateColumn").unwrap_or_default(),
            row.get("PositionSubWell").unwrap_or_default()
        );
        let Some(&well_type_id) = well_types.get(&position) else {
            tracing::warn!(
                plate = %plate.name,
                row = row.index,
                position = %position,
                "No matching xtal well type, skipping row"
            );
            skipped.push(SkippedRow {
                row: row.index,
                reason: format!("position '{position}' is not part of plate type {}", plate_type.name),
            });
            continue;
        };

        let drop_position =
            resolve_drop_position(&txn, row.get("ExternalComment").unwrap_or_default()).await?;
        insert_xtal_well(&txn, plate.id, well_type_id, Some(drop_position.id)).await?;
        wells_created += 1;
    }

    txn.commit().await?;
    tracing::info!(plate = %plate.name, wells_created, skipped = skipped.len(), "Created xtal plate");

    Ok(PlateIngestionReport {
        plate: xtal_plate_summary(db, plate, plate_type.name).await?,
        wells_created,
        skipped,
    })
}

async fn library_plate_summary<C: ConnectionTrait>(
    db: &C,
    plate: library_plates::Model,
    plate_type: String,
) -> TrackingResult<PlateSummary> {
    let wells = library_wells::Entity::find()
        .filter(library_wells::Column::PlateId.eq(plate.id))
        .count(db)
        .await?;
    let available_wells = available_library_wells(db, plate.id).await?.len();
    Ok(PlateSummary {
        id: plate.id,
        name: plate.name,
        plate_type,
        wells: usize::try_from(wells).unwrap_or(usize::MAX),
        available_wells,
    })
}

async fn xtal_plate_summary<C: ConnectionTrait>(
    db: &C,
    plate: xtal_plates::Model,
    plate_type: String,
) -> TrackingResult<PlateSummary> {
    let wells = xtal_wells::Entity::find()
        .filter(xtal_wells::Column::PlateId.eq(plate.id))
        .count(db)
        .await?;
    let available_wells = available_xtal_wells(db, plate.id).await?.len();
    Ok(PlateSummary {
        id: plate.id,
        name: plate.name,
        plate_type,
        wells: usize::try_from(wells).unwrap_or(usize::MAX),
        available_wells,
    })
}

pub async fn list_library_plates<C: ConnectionTrait>(db: &C) -> TrackingResult<Vec<PlateSummary>> {
    let plates = library_plates::Entity::find()
        .find_also_related(library_plate_types::Entity)
        .order_by_asc(library_plates::Column::Name)
        .all(db)
        .await?;
    let mut summaries = Vec::with_capacity(plates.len());
    for (plate, plate_type) in plates {
        let plate_type = plate_type.map(|t| t.name).unwrap_or_default();
        summaries.push(library_plate_summary(db, plate, plate_type).await?);
    }
    Ok(summaries)
}

pub async fn list_xtal_plates<C: ConnectionTrait>(db: &C) -> TrackingResult<Vec<PlateSummary>> {
    let plates = xtal_plates::Entity::find()
        .find_also_related(xtal_plate_types::Entity)
        .order_by_asc(xtal_plates::Column::Name)
        .all(db)
        .await?;
    let mut summaries = Vec::with_capacity(plates.len());
    for (plate, plate_type) in plates {
        let plate_type = plate_type.map(|t| t.name).unwrap_or_default();
        summaries.push(xtal_plate_summary(db, plate, plate_type).await?);
    }
    Ok(summaries)
}
