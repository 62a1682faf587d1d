//! Harvest reconciliation.
//!
//! Every log row with a comment is applied in its own transaction. A row that
//! cannot be matched or parsed is skipped and reported. A row that hits a
//! uniqueness conflict (a second pin for one crystal well) is rolled back and
//! ends the run; rows committed before it stay committed.

use super::models::{AbortedRow, HARVEST_COLUMNS, HarvestReport};
use crate::common::errors::{DbErrorExt, TrackingError, TrackingResult};
use crate::common::models::SkippedRow;
use crate::services::log_reader::{LogRow, LogTable, parse_log_timestamp};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;
use xtal_entity::{
    library_wells, pins, puck_types, pucks, transfers, xtal_plates, xtal_well_types, xtal_wells,
};

pub const PUCK_SLOTS: std::ops::RangeInclusive<i32> = 1..=16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    Observed,
    Harvested,
}

#[derive(Debug)]
enum RowFailure {
    Skip(String),
    Conflict(String),
    Fatal(TrackingError),
}

impl From<TrackingError> for RowFailure {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::ConstraintViolation { .. } => RowFailure::Conflict(err.to_string()),
            other => RowFailure::Fatal(other),
        }
    }
}

impl From<DbErr> for RowFailure {
    fn from(err: DbErr) -> Self {
        TrackingError::from(err).into()
    }
}

#[derive(Debug, Clone)]
struct PinPlacement {
    puck_name: String,
    position: i32,
    time_departure: Option<NaiveDateTime>,
    pick_duration: Option<String>,
}

/// Pin columns are only read when `DestinationLocation` is present
fn pin_placement(row: &LogRow) -> Result<Option<PinPlacement>, RowFailure> {
    let Some(location) = row.get("DestinationLocation") else {
        return Ok(None);
    };
    let position: i32 = location.parse().map_err(|_| {
        RowFailure::Skip(format!("DestinationLocation '{location}' is not a slot number"))
    })?;
    if !PUCK_SLOTS.contains(&position) {
        return Err(RowFailure::Skip(format!(
            "DestinationLocation {position} is outside puck slots 1-16"
        )));
    }
    let puck_name = row
        .get("DestinationName")
        .ok_or_else(|| RowFailure::Skip("DestinationLocation given without DestinationName".to_string()))?
        .to_string();
    let time_departure = row
        .get("TimeDeparture")
        .map(parse_log_timestamp)
        .transpose()
        .map_err(|e| RowFailure::Skip(format!("TimeDeparture: {e:#}")))?;

    Ok(Some(PinPlacement {
        puck_name,
        position,
        time_departure,
        pick_duration: row.get("Duration").map(str::to_string),
    }))
}

/// Get-or-create of the puck type with this name, then of its puck
pub async fn resolve_puck(txn: &DatabaseTransaction, name: &str) -> TrackingResult<pucks::Model> {
    let puck_type = match puck_types::Entity::find()
        .filter(puck_types::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        Some(puck_type) => puck_type,
        None => {
            tracing::info!(puck = %name, "Registering new puck type");
            puck_types::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name.to_string()),
            }
            .insert(txn)
            .await
            .map_err(|e| e.to_tracking_error("puck_types"))?
        }
    };

    let existing = pucks::Entity::find()
        .filter(pucks::Column::PuckTypeId.eq(puck_type.id))
        .order_by_desc(pucks::Column::Timestamp)
        .one(txn)
        .await?;
    match existing {
        Some(puck) => Ok(puck),
        None => Ok(pucks::ActiveModel {
            id: Set(Uuid::new_v4()),
            puck_type_id: Set(puck_type.id),
            timestamp: Set(chrono::Local::now().naive_local()),
        }
        .insert(txn)
        .await
        .map_err(|e| e.to_tracking_error("pucks"))?),
    }
}

/// Crystal well on a plate by shifter position, e.g. `B7a`
pub async fn find_xtal_well<C: sea_orm::ConnectionTrait>(
    db: &C,
    plate_id: Uuid,
    position: &str,
) -> TrackingResult<Option<xtal_wells::Model>> {
    Ok(xtal_wells::Entity::find()
        .inner_join(xtal_well_types::Entity)
        .filter(xtal_wells::Column::PlateId.eq(plate_id))
        .filter(xtal_well_types::Column::Name.eq(position))
        .one(db)
        .await?)
}

async fn apply_row(
    txn: &DatabaseTransaction,
    plate_id: Uuid,
    row: &LogRow,
    comment: &str,
) -> Result<RowOutcome, RowFailure> {
    let position = format!(
        "{}{}{}",
        row.get("PlateRow").unwrap_or_default(),
        row.get("PlateColumn").unwrap_or_default(),
        row.get("PositionSubWell").unwrap_or_default()
    );
    let Some(well) = find_xtal_well(txn, plate_id, &position).await? else {
        return Err(RowFailure::Skip(format!("no xtal well at position '{position}'")));
    };
    let time_arrival = row
        .get("TimeArrival")
        .ok_or_else(|| RowFailure::Skip("missing TimeArrival".to_string()))
        .and_then(|raw| {
            parse_log_timestamp(raw).map_err(|e| RowFailure::Skip(format!("TimeArrival: {e:#}")))
        })?;
    let placement = pin_placement(row)?;

    let well_id = well.id;
    let mut active: xtal_wells::ActiveModel = well.into();
    active.harvest_comment = Set(Some(comment.to_string()));
    active.harvesting_status = Set(true);
    active.time_arrival = Set(Some(time_arrival));
    active.update(txn).await?;

    let transfer = transfers::Entity::find()
        .filter(transfers::Column::ToWellId.eq(well_id))
        .one(txn)
        .await?;
    if let Some(transfer) = transfer {
        library_wells::Entity::update_many()
            .col_expr(library_wells::Column::Used, sea_orm::sea_query::Expr::value(true))
            .filter(library_wells::Column::Id.eq(transfer.from_well_id))
            .exec(txn)
            .await?;
    }

    let Some(placement) = placement else {
        return Ok(RowOutcome::Observed);
    };

    let puck = resolve_puck(txn, &placement.puck_name).await?;
    pins::ActiveModel {
        id: Set(Uuid::new_v4()),
        puck_id: Set(puck.id),
        position: Set(placement.position),
        xtal_well_id: Set(well_id),
        time_departure: Set(placement.time_departure),
        pick_duration: Set(placement.pick_duration),
        xray_status: Set(pins::XrayStatus::NotCollected),
    }
    .insert(txn)
    .await
    .map_err(|e| RowFailure::from(e.to_tracking_error("pins")))?;

    Ok(RowOutcome::Harvested)
}

/// Runs a harvest log against the store. The log must name exactly one plate
/// and that plate must exist; both are checked before anything is written.
pub async fn ingest_harvest_log(
    db: &DatabaseConnection,
    table: &LogTable,
) -> TrackingResult<HarvestReport> {
    table
        .require_columns(&HARVEST_COLUMNS)
        .map_err(|e| crate::input_shape_error!("file", e))?;

    let plate_names = table.distinct("PlateID");
    let [plate_name] = plate_names.as_slice() else {
        return Err(crate::input_shape_error!(
            "PlateID",
            format!("cannot ingest a harvest log naming {} plates", plate_names.len())
        ));
    };
    let plate = xtal_plates::Entity::find()
        .filter(xtal_plates::Column::Name.eq(plate_name.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("xtal plate", plate_name))?;

    let mut report = HarvestReport {
        plate_name: plate.name.clone(),
        rows_read: table.rows.len(),
        ..HarvestReport::default()
    };

    for row in &table.rows {
        // Rows without a comment were never touched by the operator
        let Some(comment) = row.get("Comment") else {
            continue;
        };

        let txn = db.begin().await?;
        match apply_row(&txn, plate.id, row, comment).await {
            Ok(outcome) => {
                if let Err(err) = txn.commit().await {
                    match TrackingError::from(err) {
                        conflict @ TrackingError::ConstraintViolation { .. } => {
                            report.aborted = Some(AbortedRow {
                                row: row.index,
                                reason: conflict.to_string(),
                            });
                            break;
                        }
                        other => return Err(other),
                    }
                }
                report.rows_committed += 1;
                match outcome {
                    RowOutcome::Observed => report.wells_observed += 1,
                    RowOutcome::Harvested => report.pins_created += 1,
                }
            }
            Err(RowFailure::Skip(reason)) => {
                txn.rollback().await?;
                tracing::warn!(plate = %plate.name, row = row.index, %reason, "Skipping harvest row");
                report.skipped.push(SkippedRow {
                    row: row.index,
                    reason,
                });
            }
            Err(RowFailure::Conflict(reason)) => {
                txn.rollback().await?;
                tracing::warn!(plate = %plate.name, row = row.index, %reason, "Harvest ingestion aborted");
                report.aborted = Some(AbortedRow {
                    row: row.index,
                    reason,
                });
                break;
            }
            Err(RowFailure::Fatal(err)) => return Err(err),
        }
    }

    tracing::info!(
        plate = %report.plate_name,
        rows_committed = report.rows_committed,
        pins_created = report.pins_created,
        skipped = report.skipped.len(),
        aborted = report.aborted.is_some(),
        "Harvest log ingested"
    );
    Ok(report)
}
