use super::models::{CsvExport, CsvRow, EchoRow, HarvestTemplateRow, PinTrackingRow};
use crate::common::errors::{TrackingError, TrackingResult};
use crate::geometry::services::{device_coordinates, resolve_drop_position};
use crate::projects::models as projects;
use crate::services::log_reader::LOG_TIMESTAMP_FORMAT;
use crate::transfers::services::{batch_transfers, find_batch};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;
use xtal_entity::{
    drop_positions, library_plates, library_well_types, library_wells, pins, puck_types, pucks,
    xtal_plate_types, xtal_plates, xtal_well_types, xtal_wells,
};

pub fn render_csv<T: CsvRow>(rows: &[T]) -> TrackingResult<Vec<u8>> {
    let csv_error = |e: csv::Error| TrackingError::DataIntegrity {
        message: format!("failed to render CSV: {e}"),
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(T::HEADERS).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| TrackingError::DataIntegrity {
            message: format!("failed to flush CSV: {e}"),
        })
}

/// Splits a shifter position such as `B12a` into row, column and subwell
pub fn split_shifter_position(name: &str) -> Option<(&str, &str, &str)> {
    let column_start = name.find(|c: char| c.is_ascii_digit())?;
    let column_end = name[column_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(name.len(), |offset| column_start + offset);
    let row = &name[..column_start];
    if row.is_empty() {
        return None;
    }
    Some((row, &name[column_start..column_end], &name[column_end..]))
}

fn missing(what: &str, id: Uuid) -> TrackingError {
    TrackingError::DataIntegrity {
        message: format!("{what} {id} referenced by a transfer does not exist"),
    }
}

struct SourceWell {
    well: library_wells::Model,
    well_name: String,
    plate_name: String,
}

async fn source_well<C: ConnectionTrait>(db: &C, well_id: Uuid) -> TrackingResult<SourceWell> {
    let (well, well_type) = library_wells::Entity::find_by_id(well_id)
        .find_also_related(library_well_types::Entity)
        .one(db)
        .await?
        .ok_or_else(|| missing("library well", well_id))?;
    let well_type = well_type.ok_or_else(|| missing("library well type", well.well_type_id))?;
    let plate = library_plates::Entity::find_by_id(well.plate_id)
        .one(db)
        .await?
        .ok_or_else(|| missing("library plate", well.plate_id))?;

    Ok(SourceWell {
        well,
        well_name: well_type.name,
        plate_name: plate.name,
    })
}

struct DestinationWell {
    well: xtal_wells::Model,
    well_name: String,
    plate_name: String,
    plate_type: String,
}

async fn destination_well<C: ConnectionTrait>(
    db: &C,
    well_id: Uuid,
) -> TrackingResult<DestinationWell> {
    let (well, well_type) = xtal_wells::Entity::find_by_id(well_id)
        .find_also_related(xtal_well_types::Entity)
        .one(db)
        .await?
        .ok_or_else(|| missing("xtal well", well_id))?;
    let well_type = well_type.ok_or_else(|| missing("xtal well type", well.well_type_id))?;
    let (plate, plate_type) = xtal_plates::Entity::find_by_id(well.plate_id)
        .find_also_related(xtal_plate_types::Entity)
        .one(db)
        .await?
        .ok_or_else(|| missing("xtal plate", well.plate_id))?;

    Ok(DestinationWell {
        well,
        well_name: well_type.name,
        plate_name: plate.name,
        plate_type: plate_type.map(|t| t.name).unwrap_or_default(),
    })
}

/// Drop position of a crystal well. Wells created before drop positions were
/// recorded get the centre position, which is written back.
async fn drop_position_or_centre(
    txn: &DatabaseTransaction,
    well: &xtal_wells::Model,
) -> TrackingResult<drop_positions::Model> {
    if let Some(id) = well.drop_position_id {
        return drop_positions::Entity::find_by_id(id)
            .one(txn)
            .await?
            .ok_or_else(|| missing("drop position", id));
    }

    let centre = resolve_drop_position(txn, "c").await?;
    let mut active: xtal_wells::ActiveModel = well.clone().into();
    active.drop_position_id = Set(Some(centre.id));
    active.update(txn).await?;
    tracing::info!(well = %well.id, "Backfilled missing drop position with centre");
    Ok(centre)
}

pub async fn echo_protocol(db: &DatabaseConnection, batch_id: Uuid) -> TrackingResult<CsvExport> {
    let txn = db.begin().await?;
    let batch = find_batch(&txn, batch_id).await?;
    let transfers = batch_transfers(&txn, batch_id).await?;

    let mut rows = Vec::with_capacity(transfers.len());
    for transfer in &transfers {
        let source = source_well(&txn, transfer.from_well_id).await?;
        let destination = destination_well(&txn, transfer.to_well_id).await?;
        let drop = drop_position_or_centre(&txn, &destination.well).await?;
        let map = device_coordinates(&txn, destination.well.well_type_id).await?;

        rows.push(EchoRow {
            batch: batch.name.clone(),
            source_plate_name: source.plate_name,
            source_well: source.well_name,
            destination_plate_name: destination.plate_name,
            destination_well: map.echo,
            transfer_volume: transfer.transfer_volume,
            destination_well_x_offset: drop.x_offset + map.well_pos_x,
            destination_well_y_offset: drop.y_offset + map.well_pos_y,
        });
    }
    txn.commit().await?;

    let xtal_plate = rows
        .first()
        .map(|row| row.destination_plate_name.clone())
        .unwrap_or_default();
    Ok(CsvExport {
        filename: format!("echo_protocol_{xtal_plate}-{}.csv", batch.name),
        body: render_csv(&rows)?,
    })
}

pub async fn harvest_template(
    db: &DatabaseConnection,
    batch_id: Uuid,
) -> TrackingResult<CsvExport> {
    let batch = find_batch(db, batch_id).await?;
    let transfers = batch_transfers(db, batch_id).await?;

    let mut rows = Vec::with_capacity(transfers.len());
    for transfer in &transfers {
        let source = source_well(db, transfer.from_well_id).await?;
        let destination = destination_well(db, transfer.to_well_id).await?;
        let (plate_row, plate_column, subwell) = split_shifter_position(&destination.well_name)
            .ok_or_else(|| TrackingError::DataIntegrity {
                message: format!(
                    "xtal well type '{}' is not a shifter position",
                    destination.well_name
                ),
            })?;
        let external_comment = match destination.well.drop_position_id {
            Some(id) => drop_positions::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| missing("drop position", id))?
                .name,
            None => "c".to_string(),
        };

        rows.push(HarvestTemplateRow {
            plate_type: destination.plate_type.clone(),
            plate_id: destination.plate_name.clone(),
            plate_row: plate_row.to_string(),
            plate_column: plate_column.to_string(),
            position_sub_well: subwell.to_string(),
            external_comment,
            catalog_id: source.well.catalog_id,
            smiles: source.well.smiles,
            transfer_volume: transfer.transfer_volume,
        });
    }

    Ok(CsvExport {
        filename: format!("harvesting_{}.csv", batch.name),
        body: render_csv(&rows)?,
    })
}

/// One row per pin mounted from a destination well of the batch, in
/// destination sequence order
pub async fn pin_tracking(db: &DatabaseConnection, batch_id: Uuid) -> TrackingResult<CsvExport> {
    let batch = find_batch(db, batch_id).await?;
    let project = projects::Entity::find_by_id(batch.project_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("project", batch.project_id))?;
    let transfers = batch_transfers(db, batch_id).await?;

    let well_ids: Vec<Uuid> = transfers.iter().map(|t| t.to_well_id).collect();
    let mut pins_by_well: HashMap<Uuid, (pins::Model, Option<pucks::Model>)> =
        pins::Entity::find()
            .filter(pins::Column::XtalWellId.is_in(well_ids))
            .find_also_related(pucks::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|(pin, puck)| (pin.xtal_well_id, (pin, puck)))
            .collect();

    let mut puck_names: HashMap<Uuid, String> = HashMap::new();
    let mut rows = Vec::new();
    for transfer in &transfers {
        let Some((pin, puck)) = pins_by_well.remove(&transfer.to_well_id) else {
            continue;
        };
        let puck = puck.ok_or_else(|| missing("puck", pin.puck_id))?;
        let puck_name = match puck_names.get(&puck.puck_type_id) {
            Some(name) => name.clone(),
            None => {
                let name = puck_types::Entity::find_by_id(puck.puck_type_id)
                    .one(db)
                    .await?
                    .ok_or_else(|| missing("puck type", puck.puck_type_id))?
                    .name;
                puck_names.insert(puck.puck_type_id, name.clone());
                name
            }
        };
        let source = source_well(db, transfer.from_well_id).await?;
        let well = xtal_wells::Entity::find_by_id(transfer.to_well_id)
            .one(db)
            .await?
            .ok_or_else(|| missing("xtal well", transfer.to_well_id))?;

        rows.push(PinTrackingRow {
            puck_name,
            position: pin.position,
            sample_name: format!("{}-{}", project.target, pin.id),
            proposal_num: project.proposal_id,
            catalog_id: source.well.catalog_id,
            smiles: source.well.smiles,
            time_departure: pin
                .time_departure
                .map(|t| t.format(LOG_TIMESTAMP_FORMAT).to_string()),
            harvest_comment: well.harvest_comment,
        });
    }

    Ok(CsvExport {
        filename: format!("pins_{}.csv", batch.name),
        body: render_csv(&rows)?,
    })
}
