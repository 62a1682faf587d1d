//! Wells still free to take part in a transfer, in sequence order.
//!
//! The result is only valid until the next batch is built; callers query again
//! rather than caching it.

use crate::common::errors::TrackingResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::Query,
};
use uuid::Uuid;
use xtal_entity::{library_wells, transfers, xtal_wells};

/// Library wells that are unused and never a transfer source
pub async fn available_library_wells<C: ConnectionTrait>(
    db: &C,
    plate_id: Uuid,
) -> TrackingResult<Vec<library_wells::Model>> {
    Ok(library_wells::Entity::find()
        .filter(library_wells::Column::PlateId.eq(plate_id))
        .filter(library_wells::Column::Used.eq(false))
        .filter(
            library_wells::Column::Id.not_in_subquery(
                Query::select()
                    .column(transfers::Column::FromWellId)
                    .from(transfers::Entity)
                    .to_owned(),
            ),
        )
        .order_by_asc(library_wells::Column::Sequence)
        .all(db)
        .await?)
}

/// Crystal wells that are unharvested and never a transfer destination
pub async fn available_xtal_wells<C: ConnectionTrait>(
    db: &C,
    plate_id: Uuid,
) -> TrackingResult<Vec<xtal_wells::Model>> {
    Ok(xtal_wells::Entity::find()
        .filter(xtal_wells::Column::PlateId.eq(plate_id))
        .filter(xtal_wells::Column::HarvestingStatus.eq(false))
        .filter(
            xtal_wells::Column::Id.not_in_subquery(
                Query::select()
                    .column(transfers::Column::ToWellId)
                    .from(transfers::Entity)
                    .to_owned(),
            ),
        )
        .order_by_asc(xtal_wells::Column::Sequence)
        .all(db)
        .await?)
}
