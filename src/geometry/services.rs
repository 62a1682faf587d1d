use super::{DROP_POSITION_CODES, DropZone, normalize_code};
use crate::common::errors::{DbErrorExt, TrackingError, TrackingResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;
use xtal_entity::{drop_positions, well_maps, xtal_well_types};

/// Inserts any drop position row that is missing. Existing rows keep their
/// stored offsets.
pub async fn seed_drop_positions<C: ConnectionTrait>(db: &C, step: i32) -> TrackingResult<usize> {
    let mut created = 0;
    for code in DROP_POSITION_CODES {
        let exists = drop_positions::Entity::find()
            .filter(drop_positions::Column::Name.eq(code))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let (x_offset, y_offset) = code.parse::<DropZone>()?.offset(step);
        drop_positions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(code.to_string()),
            x_offset: Set(x_offset),
            y_offset: Set(y_offset),
        }
        .insert(db)
        .await
        .map_err(|e| e.to_tracking_error("drop_positions"))?;
        created += 1;
    }

    if created > 0 {
        tracing::info!(created, step, "Seeded drop positions");
    }
    Ok(created)
}

/// Resolves a drop-zone code to its stored position. Empty input resolves to
/// the centre; an unrecognised code is a configuration error.
pub async fn resolve_drop_position<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> TrackingResult<drop_positions::Model> {
    let zone: DropZone = code.parse()?;
    let name = match normalize_code(code) {
        normalized if normalized.is_empty() => zone.canonical_code().to_string(),
        normalized => normalized,
    };

    drop_positions::Entity::find()
        .filter(drop_positions::Column::Name.eq(name.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("drop position", name))
}

pub async fn list_drop_positions<C: ConnectionTrait>(
    db: &C,
) -> TrackingResult<Vec<drop_positions::Model>> {
    Ok(drop_positions::Entity::find()
        .order_by_asc(drop_positions::Column::Name)
        .all(db)
        .await?)
}

/// Echo and shifter names of a crystal well type. There is no fallback: a
/// well type without a map means the catalog is broken.
pub async fn device_coordinates<C: ConnectionTrait>(
    db: &C,
    well_type_id: Uuid,
) -> TrackingResult<well_maps::Model> {
    let well_type = xtal_well_types::Entity::find_by_id(well_type_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("xtal well type", well_type_id))?;

    well_maps::Entity::find_by_id(well_type.well_map_id)
        .one(db)
        .await?
        .ok_or_else(|| TrackingError::DataIntegrity {
            message: format!(
                "xtal well type '{}' references missing well map {}",
                well_type.name, well_type.well_map_id
            ),
        })
}
