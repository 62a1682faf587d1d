//! Transfer batch builder.
//!
//! Source and destination pools arrive in sequence order; the first `count`
//! of each are paired element-wise. A batch and all of its transfers are
//! written in one transaction.

use super::models::{
    Batch, BatchCreate, BatchListItem, MAX_TRANSFER_VOLUME, MIN_TRANSFER_VOLUME, PlannedTransfer,
    SolventSeries, VolumePlan,
};
use crate::common::errors::{DbErrorExt, TrackingResult};
use crate::plates::pools::{available_library_wells, available_xtal_wells};
use crate::projects::models as projects;
use crate::services::log_reader::parse_batch_timestamp;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;
use xtal_entity::{batches, library_plates, library_wells, transfers, xtal_plates, xtal_wells};

pub fn check_volume(volume: i32) -> TrackingResult<()> {
    if (MIN_TRANSFER_VOLUME..=MAX_TRANSFER_VOLUME).contains(&volume) {
        Ok(())
    } else {
        Err(crate::constraint_violation!(
            "transfer_volume_range",
            format!(
                "transfer volume {volume} nL is outside [{MIN_TRANSFER_VOLUME}, {MAX_TRANSFER_VOLUME}]"
            )
        ))
    }
}

/// `start, start+step, ..` up to and including `stop`, each value repeated
/// `replicates` times. The series is sized before it is generated and must
/// fit in `capacity` destination wells.
pub fn solvent_volumes(series: &SolventSeries, capacity: usize) -> TrackingResult<Vec<i32>> {
    let step = usize::try_from(series.step)
        .ok()
        .filter(|step| *step > 0)
        .ok_or_else(|| crate::input_shape_error!("solvent.step", "step must be positive"))?;
    if series.start > series.stop {
        return Err(crate::input_shape_error!(
            "solvent.start",
            format!("start {} is greater than stop {}", series.start, series.stop)
        ));
    }
    if series.replicates == 0 {
        return Err(crate::input_shape_error!(
            "solvent.replicates",
            "at least one replicate is required"
        ));
    }

    let span = i64::from(series.stop) - i64::from(series.start);
    let replicates = usize::try_from(series.replicates).ok();
    let length = usize::try_from(span / i64::from(series.step) + 1)
        .ok()
        .zip(replicates)
        .and_then(|(values, replicates)| values.checked_mul(replicates))
        .filter(|length| *length <= capacity)
        .ok_or_else(|| {
            crate::input_shape_error!(
                "solvent",
                format!("series does not fit in the {capacity} available xtal wells")
            )
        })?;

    let replicates = series.replicates as usize;
    let mut volumes = Vec::with_capacity(length);
    volumes.extend(
        (series.start..=series.stop)
            .step_by(step)
            .flat_map(|volume| std::iter::repeat_n(volume, replicates)),
    );
    Ok(volumes)
}

/// Pairs the first `count` sources with the first `count` destinations.
pub fn plan_transfers(
    sources: &[library_wells::Model],
    destinations: &[xtal_wells::Model],
    count: usize,
    volumes: &VolumePlan,
) -> TrackingResult<Vec<PlannedTransfer>> {
    if count == 0 {
        return Err(crate::input_shape_error!("count", "at least one transfer is required"));
    }
    if count > sources.len() {
        return Err(crate::input_shape_error!(
            "count",
            format!("{count} transfers requested but only {} library wells are available", sources.len())
        ));
    }
    if count > destinations.len() {
        return Err(crate::input_shape_error!(
            "count",
            format!("{count} transfers requested but only {} xtal wells are available", destinations.len())
        ));
    }

    let per_transfer: Vec<i32> = match volumes {
        VolumePlan::Constant(volume) => vec![*volume; count],
        VolumePlan::PerTransfer(list) if list.len() == count => list.clone(),
        VolumePlan::PerTransfer(list) => {
            return Err(crate::input_shape_error!(
                "volumes",
                format!("expected {count} volumes, got {}", list.len())
            ));
        }
    };
    for volume in &per_transfer {
        check_volume(*volume)?;
    }

    Ok(sources
        .iter()
        .zip(destinations)
        .zip(per_transfer)
        .map(|((source, destination), volume)| PlannedTransfer {
            from_well_id: source.id,
            to_well_id: destination.id,
            volume,
        })
        .collect())
}

/// Repeats one solvent well against a generated volume list. There must be a
/// destination for every volume; the list is never truncated.
pub fn plan_solvent_transfers(
    solvent_well_id: Uuid,
    destinations: &[xtal_wells::Model],
    volumes: &[i32],
) -> TrackingResult<Vec<PlannedTransfer>> {
    if volumes.is_empty() {
        return Err(crate::input_shape_error!("solvent", "series produced no volumes"));
    }
    if volumes.len() > destinations.len() {
        return Err(crate::input_shape_error!(
            "solvent",
            format!(
                "series needs {} xtal wells but only {} are available",
                volumes.len(),
                destinations.len()
            )
        ));
    }
    for volume in volumes {
        check_volume(*volume)?;
    }

    Ok(destinations
        .iter()
        .zip(volumes)
        .map(|(destination, volume)| PlannedTransfer {
            from_well_id: solvent_well_id,
            to_well_id: destination.id,
            volume: *volume,
        })
        .collect())
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

async fn insert_batch(
    txn: &DatabaseTransaction,
    project_id: Uuid,
    name: Option<String>,
    planned: &[PlannedTransfer],
) -> TrackingResult<Batch> {
    if planned.is_empty() {
        return Err(crate::input_shape_error!("count", "a batch needs at least one transfer"));
    }

    let name = match name.map(|name| name.trim().to_string()) {
        Some(name) if !name.is_empty() => name,
        _ => format!("Batch {}", batches::Entity::find().count(txn).await? + 1),
    };
    let timestamp = now();

    let batch = batches::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        project_id: Set(project_id),
        timestamp: Set(timestamp),
    }
    .insert(txn)
    .await
    .map_err(|e| e.to_tracking_error("batches"))?;

    let mut created = Vec::with_capacity(planned.len());
    for transfer in planned {
        let model = transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(batch.id),
            from_well_id: Set(transfer.from_well_id),
            to_well_id: Set(transfer.to_well_id),
            transfer_volume: Set(transfer.volume),
            timestamp: Set(Some(timestamp)),
        }
        .insert(txn)
        .await
        .map_err(|e| e.to_tracking_error("transfers"))?;
        created.push(model);
    }

    tracing::info!(batch = %batch.name, transfers = created.len(), "Created transfer batch");
    Ok(Batch::from_parts(batch, created))
}

/// Persists a planned batch atomically: the batch and every transfer, or
/// nothing.
pub async fn build_batch(
    db: &DatabaseConnection,
    project_id: Uuid,
    name: Option<String>,
    planned: &[PlannedTransfer],
) -> TrackingResult<Batch> {
    let txn = db.begin().await?;
    let batch = insert_batch(&txn, project_id, name, planned).await?;
    txn.commit().await?;
    Ok(batch)
}

async fn plan_batch<C: ConnectionTrait>(
    db: &C,
    request: &BatchCreate,
) -> TrackingResult<Vec<PlannedTransfer>> {
    let modes = [
        request.volume.is_some(),
        request.volumes.is_some(),
        request.solvent.is_some(),
    ];
    if modes.iter().filter(|given| **given).count() != 1 {
        return Err(crate::input_shape_error!(
            "volume",
            "give exactly one of volume, volumes or solvent"
        ));
    }

    projects::Entity::find_by_id(request.project_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("project", request.project_id))?;
    library_plates::Entity::find_by_id(request.library_plate_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("library plate", request.library_plate_id))?;
    xtal_plates::Entity::find_by_id(request.xtal_plate_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("xtal plate", request.xtal_plate_id))?;

    let sources = available_library_wells(db, request.library_plate_id).await?;
    let destinations = available_xtal_wells(db, request.xtal_plate_id).await?;

    if let Some(series) = &request.solvent {
        let solvent_well_id = match series.library_well_id {
            Some(id) => {
                let well = library_wells::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| crate::not_found!("library well", id))?;
                if well.plate_id != request.library_plate_id {
                    return Err(crate::input_shape_error!(
                        "solvent.library_well_id",
                        "solvent well is not on the selected library plate"
                    ));
                }
                well.id
            }
            None => {
                sources
                    .first()
                    .ok_or_else(|| {
                        crate::input_shape_error!("solvent", "library plate has no available wells")
                    })?
                    .id
            }
        };
        let volumes = solvent_volumes(series, destinations.len())?;
        plan_solvent_transfers(solvent_well_id, &destinations, &volumes)
    } else if let Some(volumes) = &request.volumes {
        let count = request.count.unwrap_or(volumes.len());
        plan_transfers(&sources, &destinations, count, &VolumePlan::PerTransfer(volumes.clone()))
    } else {
        let count = request
            .count
            .ok_or_else(|| crate::input_shape_error!("count", "count is required"))?;
        let volume = request.volume.unwrap_or_default();
        plan_transfers(&sources, &destinations, count, &VolumePlan::Constant(volume))
    }
}

/// Plans against the current pools, then persists through [`build_batch`].
/// Unique destination wells keep two concurrent batches from sharing a well.
pub async fn create_batch(db: &DatabaseConnection, request: BatchCreate) -> TrackingResult<Batch> {
    let planned = plan_batch(db, &request).await?;
    build_batch(db, request.project_id, request.name, &planned).await
}

pub async fn list_batches(db: &DatabaseConnection) -> TrackingResult<Vec<BatchListItem>> {
    let rows = batches::Entity::find()
        .find_with_related(transfers::Entity)
        .order_by_asc(batches::Column::Timestamp)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(batch, transfers)| BatchListItem {
            id: batch.id,
            name: batch.name,
            project_id: batch.project_id,
            timestamp: batch.timestamp,
            transfer_count: transfers.len(),
        })
        .collect())
}

/// Transfers of a batch in destination sequence order
pub async fn batch_transfers<C: ConnectionTrait>(
    db: &C,
    batch_id: Uuid,
) -> TrackingResult<Vec<transfers::Model>> {
    Ok(transfers::Entity::find()
        .filter(transfers::Column::BatchId.eq(batch_id))
        .inner_join(xtal_wells::Entity)
        .order_by_asc(xtal_wells::Column::PlateId)
        .order_by_asc(xtal_wells::Column::Sequence)
        .all(db)
        .await?)
}

pub async fn find_batch<C: ConnectionTrait>(
    db: &C,
    batch_id: Uuid,
) -> TrackingResult<batches::Model> {
    batches::Entity::find_by_id(batch_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("batch", batch_id))
}

pub async fn get_batch(db: &DatabaseConnection, batch_id: Uuid) -> TrackingResult<Batch> {
    let batch = find_batch(db, batch_id).await?;
    let transfers = batch_transfers(db, batch_id).await?;
    Ok(Batch::from_parts(batch, transfers))
}

/// Records when the batch was actually dispensed
pub async fn update_batch_timestamp(
    db: &DatabaseConnection,
    batch_id: Uuid,
    raw: &str,
) -> TrackingResult<Batch> {
    let timestamp = parse_batch_timestamp(raw)
        .map_err(|e| crate::input_shape_error!("timestamp", format!("{e:#}")))?;
    let batch = find_batch(db, batch_id).await?;

    let mut active: batches::ActiveModel = batch.into();
    active.timestamp = Set(timestamp);
    active.update(db).await?;
    tracing::info!(%batch_id, %timestamp, "Updated batch timestamp");

    get_batch(db, batch_id).await
}
