//! Standard labware catalog: the 1536-well library plate, the MRC 2-drop
//! crystallization plate with its echo/shifter map, and every drop position.
//!
//! Each plate type is created together with its well types in one
//! transaction, so an existing plate type is taken to be complete.

use crate::common::errors::{DbErrorExt, TrackingResult};
use crate::geometry::services::seed_drop_positions;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use xtal_entity::{
    library_plate_type_well_types, library_plate_types, library_well_types, well_maps,
    xtal_plate_type_well_types, xtal_plate_types, xtal_well_types,
};

pub const LIBRARY_PLATE_TYPE: &str = "1536LDV";
pub const LIBRARY_PLATE_ROWS: usize = 32;
pub const LIBRARY_PLATE_COLUMNS: usize = 48;
pub const XTAL_PLATE_TYPE: &str = "SwissCI-MRC-2d";
/// Vertical distance between the `a` and `b` drops of an MRC 2-drop well
pub const SUBWELL_B_Y_OFFSET: i32 = 1350;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub library_plate_types_created: usize,
    pub library_well_types_created: usize,
    pub xtal_plate_types_created: usize,
    pub xtal_well_types_created: usize,
    pub drop_positions_created: usize,
}

/// Row labels `A`..`Z` followed by `AA`, `AB`, ...
pub fn row_label(index: usize) -> String {
    const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if index < 26 {
        char::from(LETTERS[index]).to_string()
    } else {
        format!(
            "{}{}",
            char::from(LETTERS[index / 26 - 1]),
            char::from(LETTERS[index % 26])
        )
    }
}

/// `A01`..`AF48`, row-major
pub fn library_well_names() -> Vec<String> {
    (0..LIBRARY_PLATE_ROWS)
        .flat_map(|row| {
            (1..=LIBRARY_PLATE_COLUMNS).map(move |column| format!("{}{column:02}", row_label(row)))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellMapEntry {
    pub echo: String,
    pub shifter: String,
    pub x: i32,
    pub y: i32,
}

/// Shifter positions paired in order with echo positions. The echo grid is
/// larger than the plate, so only its first 192 names are used.
pub fn mrc_2d_well_map() -> Vec<WellMapEntry> {
    let echo = (0..16).flat_map(|row| (1..=16).map(move |column| format!("{}{column}", row_label(row))));
    let shifter = (0..8).flat_map(|row| {
        ["a", "b"].into_iter().flat_map(move |subwell| {
            (1..=12).map(move |column| (format!("{}{column}{subwell}", row_label(row)), subwell))
        })
    });

    echo.zip(shifter)
        .map(|(echo, (shifter, subwell))| WellMapEntry {
            echo,
            shifter,
            x: 0,
            y: if subwell == "b" { SUBWELL_B_Y_OFFSET } else { 0 },
        })
        .collect()
}

async fn seed_library_plate_type<C: ConnectionTrait>(
    db: &C,
    summary: &mut CatalogSummary,
) -> TrackingResult<()> {
    let exists = library_plate_types::Entity::find()
        .filter(library_plate_types::Column::Name.eq(LIBRARY_PLATE_TYPE))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let plate_type = library_plate_types::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(LIBRARY_PLATE_TYPE.to_string()),
        rows: Set(i32::try_from(LIBRARY_PLATE_ROWS).ok()),
        columns: Set(i32::try_from(LIBRARY_PLATE_COLUMNS).ok()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_tracking_error("library_plate_types"))?;

    let well_types: Vec<library_well_types::ActiveModel> = library_well_names()
        .into_iter()
        .map(|name| library_well_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        })
        .collect();
    let links: Vec<library_plate_type_well_types::ActiveModel> = well_types
        .iter()
        .map(|well_type| library_plate_type_well_types::ActiveModel {
            plate_type_id: Set(plate_type.id),
            well_type_id: well_type.id.clone(),
        })
        .collect();
    let created = well_types.len();

    library_well_types::Entity::insert_many(well_types)
        .exec_without_returning(db)
        .await?;
    library_plate_type_well_types::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;

    summary.library_plate_types_created += 1;
    summary.library_well_types_created += created;
    Ok(())
}

async fn seed_xtal_plate_type<C: ConnectionTrait>(
    db: &C,
    summary: &mut CatalogSummary,
) -> TrackingResult<()> {
    let exists = xtal_plate_types::Entity::find()
        .filter(xtal_plate_types::Column::Name.eq(XTAL_PLATE_TYPE))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let plate_type = xtal_plate_types::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(XTAL_PLATE_TYPE.to_string()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_tracking_error("xtal_plate_types"))?;

    let mut maps = Vec::new();
    let mut well_types = Vec::new();
    let mut links = Vec::new();
    for entry in mrc_2d_well_map() {
        let map_id = Uuid::new_v4();
        let well_type_id = Uuid::new_v4();
        maps.push(well_maps::ActiveModel {
            id: Set(map_id),
            well_pos_x: Set(entry.x),
            well_pos_y: Set(entry.y),
            echo: Set(entry.echo),
            shifter: Set(entry.shifter.clone()),
        });
        well_types.push(xtal_well_types::ActiveModel {
            id: Set(well_type_id),
            name: Set(entry.shifter),
            well_map_id: Set(map_id),
        });
        links.push(xtal_plate_type_well_types::ActiveModel {
            plate_type_id: Set(plate_type.id),
            well_type_id: Set(well_type_id),
        });
    }
    let created = well_types.len();

    well_maps::Entity::insert_many(maps)
        .exec_without_returning(db)
        .await?;
    xtal_well_types::Entity::insert_many(well_types)
        .exec_without_returning(db)
        .await?;
    xtal_plate_type_well_types::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;

    summary.xtal_plate_types_created += 1;
    summary.xtal_well_types_created += created;
    Ok(())
}

/// Get-or-create of the whole standard catalog. Safe to call repeatedly.
pub async fn seed_standard_catalog(
    db: &DatabaseConnection,
    drop_zone_step: i32,
) -> TrackingResult<CatalogSummary> {
    let txn = db.begin().await?;
    let mut summary = CatalogSummary::default();

    seed_library_plate_type(&txn, &mut summary).await?;
    seed_xtal_plate_type(&txn, &mut summary).await?;
    summary.drop_positions_created = seed_drop_positions(&txn, drop_zone_step).await?;

    txn.commit().await?;
    tracing::info!(?summary, "Standard catalog seeded");
    Ok(summary)
}
