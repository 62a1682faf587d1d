use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// UUID primary key column, defaulted server-side on PostgreSQL only.
fn id_column<T>(manager: &SchemaManager, column: T) -> Result<ColumnDef, DbErr>
where
    T: IntoIden + 'static,
{
    match manager.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => Ok(ColumnDef::new(column)
            .uuid()
            .not_null()
            .primary_key()
            .default(Expr::cust("uuid_generate_v4()"))
            .to_owned()),
        sea_orm::DatabaseBackend::Sqlite => {
            Ok(ColumnDef::new(column).uuid().not_null().primary_key().to_owned())
        }
        _ => Err(DbErr::Custom("Unsupported database backend".to_string())),
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\";")
                .await?;
        }

        // Projects: experiment metadata used for naming and visit bookkeeping
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(id_column(manager, Projects::Id)?)
                    .col(
                        ColumnDef::new(Projects::Target)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Projects::ProposalId).integer())
                    .col(
                        ColumnDef::new(Projects::Year)
                            .integer()
                            .check(Expr::col(Projects::Year).gte(2023)),
                    )
                    .col(
                        ColumnDef::new(Projects::Cycle)
                            .integer()
                            .check(Expr::col(Projects::Cycle).between(1, 3)),
                    )
                    .col(
                        ColumnDef::new(Projects::Visit)
                            .integer()
                            .check(Expr::col(Projects::Visit).gte(1)),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Library labware
        manager
            .create_table(
                Table::create()
                    .table(LibraryPlateTypes::Table)
                    .if_not_exists()
                    .col(id_column(manager, LibraryPlateTypes::Id)?)
                    .col(
                        ColumnDef::new(LibraryPlateTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LibraryPlateTypes::Rows).integer())
                    .col(ColumnDef::new(LibraryPlateTypes::Columns).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryWellTypes::Table)
                    .if_not_exists()
                    .col(id_column(manager, LibraryWellTypes::Id)?)
                    .col(ColumnDef::new(LibraryWellTypes::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryPlateTypeWellTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryPlateTypeWellTypes::PlateTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryPlateTypeWellTypes::WellTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(LibraryPlateTypeWellTypes::PlateTypeId)
                            .col(LibraryPlateTypeWellTypes::WellTypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lib_ptype_wtype_plate_type_id")
                            .from(
                                LibraryPlateTypeWellTypes::Table,
                                LibraryPlateTypeWellTypes::PlateTypeId,
                            )
                            .to(LibraryPlateTypes::Table, LibraryPlateTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lib_ptype_wtype_well_type_id")
                            .from(
                                LibraryPlateTypeWellTypes::Table,
                                LibraryPlateTypeWellTypes::WellTypeId,
                            )
                            .to(LibraryWellTypes::Table, LibraryWellTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryPlates::Table)
                    .if_not_exists()
                    .col(id_column(manager, LibraryPlates::Id)?)
                    .col(
                        ColumnDef::new(LibraryPlates::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LibraryPlates::PlateTypeId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_plates_plate_type_id")
                            .from(LibraryPlates::Table, LibraryPlates::PlateTypeId)
                            .to(LibraryPlateTypes::Table, LibraryPlateTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryWells::Table)
                    .if_not_exists()
                    .col(id_column(manager, LibraryWells::Id)?)
                    .col(ColumnDef::new(LibraryWells::PlateId).uuid().not_null())
                    .col(ColumnDef::new(LibraryWells::WellTypeId).uuid().not_null())
                    .col(
                        ColumnDef::new(LibraryWells::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LibraryWells::CatalogId).string().not_null())
                    .col(ColumnDef::new(LibraryWells::Smiles).text().not_null())
                    .col(ColumnDef::new(LibraryWells::Sequence).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_wells_plate_id")
                            .from(LibraryWells::Table, LibraryWells::PlateId)
                            .to(LibraryPlates::Table, LibraryPlates::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_wells_well_type_id")
                            .from(LibraryWells::Table, LibraryWells::WellTypeId)
                            .to(LibraryWellTypes::Table, LibraryWellTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .index(
                        Index::create()
                            .name("library_wells_plate_sequence_unique")
                            .col(LibraryWells::PlateId)
                            .col(LibraryWells::Sequence)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Crystallization labware
        manager
            .create_table(
                Table::create()
                    .table(WellMaps::Table)
                    .if_not_exists()
                    .col(id_column(manager, WellMaps::Id)?)
                    .col(ColumnDef::new(WellMaps::WellPosX).integer().not_null())
                    .col(ColumnDef::new(WellMaps::WellPosY).integer().not_null())
                    .col(ColumnDef::new(WellMaps::Echo).string().not_null())
                    .col(ColumnDef::new(WellMaps::Shifter).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(XtalPlateTypes::Table)
                    .if_not_exists()
                    .col(id_column(manager, XtalPlateTypes::Id)?)
                    .col(
                        ColumnDef::new(XtalPlateTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(XtalWellTypes::Table)
                    .if_not_exists()
                    .col(id_column(manager, XtalWellTypes::Id)?)
                    .col(ColumnDef::new(XtalWellTypes::Name).string().not_null())
                    .col(ColumnDef::new(XtalWellTypes::WellMapId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_well_types_well_map_id")
                            .from(XtalWellTypes::Table, XtalWellTypes::WellMapId)
                            .to(WellMaps::Table, WellMaps::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(XtalPlateTypeWellTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(XtalPlateTypeWellTypes::PlateTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(XtalPlateTypeWellTypes::WellTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(XtalPlateTypeWellTypes::PlateTypeId)
                            .col(XtalPlateTypeWellTypes::WellTypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_ptype_wtype_plate_type_id")
                            .from(
                                XtalPlateTypeWellTypes::Table,
                                XtalPlateTypeWellTypes::PlateTypeId,
                            )
                            .to(XtalPlateTypes::Table, XtalPlateTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_ptype_wtype_well_type_id")
                            .from(
                                XtalPlateTypeWellTypes::Table,
                                XtalPlateTypeWellTypes::WellTypeId,
                            )
                            .to(XtalWellTypes::Table, XtalWellTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DropPositions::Table)
                    .if_not_exists()
                    .col(id_column(manager, DropPositions::Id)?)
                    .col(
                        ColumnDef::new(DropPositions::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DropPositions::XOffset).integer().not_null())
                    .col(ColumnDef::new(DropPositions::YOffset).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(XtalPlates::Table)
                    .if_not_exists()
                    .col(id_column(manager, XtalPlates::Id)?)
                    .col(
                        ColumnDef::new(XtalPlates::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(XtalPlates::PlateTypeId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_plates_plate_type_id")
                            .from(XtalPlates::Table, XtalPlates::PlateTypeId)
                            .to(XtalPlateTypes::Table, XtalPlateTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(XtalWells::Table)
                    .if_not_exists()
                    .col(id_column(manager, XtalWells::Id)?)
                    .col(ColumnDef::new(XtalWells::PlateId).uuid().not_null())
                    .col(ColumnDef::new(XtalWells::WellTypeId).uuid().not_null())
                    .col(ColumnDef::new(XtalWells::DropPositionId).uuid())
                    .col(
                        ColumnDef::new(XtalWells::HarvestingStatus)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(XtalWells::Sequence).integer().not_null())
                    .col(ColumnDef::new(XtalWells::TimeArrival).timestamp())
                    .col(ColumnDef::new(XtalWells::HarvestComment).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_wells_plate_id")
                            .from(XtalWells::Table, XtalWells::PlateId)
                            .to(XtalPlates::Table, XtalPlates::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_wells_well_type_id")
                            .from(XtalWells::Table, XtalWells::WellTypeId)
                            .to(XtalWellTypes::Table, XtalWellTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xtal_wells_drop_position_id")
                            .from(XtalWells::Table, XtalWells::DropPositionId)
                            .to(DropPositions::Table, DropPositions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .index(
                        Index::create()
                            .name("xtal_wells_plate_sequence_unique")
                            .col(XtalWells::PlateId)
                            .col(XtalWells::Sequence)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Transfers
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(id_column(manager, Batches::Id)?)
                    .col(ColumnDef::new(Batches::Name).string().not_null())
                    .col(ColumnDef::new(Batches::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Batches::Timestamp).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_batches_project_id")
                            .from(Batches::Table, Batches::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(id_column(manager, Transfers::Id)?)
                    .col(ColumnDef::new(Transfers::BatchId).uuid().not_null())
                    .col(ColumnDef::new(Transfers::FromWellId).uuid().not_null())
                    .col(
                        ColumnDef::new(Transfers::ToWellId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Transfers::TransferVolume)
                            .integer()
                            .not_null()
                            .check(Expr::col(Transfers::TransferVolume).between(5, 150)),
                    )
                    .col(ColumnDef::new(Transfers::Timestamp).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_batch_id")
                            .from(Transfers::Table, Transfers::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_from_well_id")
                            .from(Transfers::Table, Transfers::FromWellId)
                            .to(LibraryWells::Table, LibraryWells::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_to_well_id")
                            .from(Transfers::Table, Transfers::ToWellId)
                            .to(XtalWells::Table, XtalWells::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Pucks and pins
        manager
            .create_table(
                Table::create()
                    .table(PuckTypes::Table)
                    .if_not_exists()
                    .col(id_column(manager, PuckTypes::Id)?)
                    .col(
                        ColumnDef::new(PuckTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pucks::Table)
                    .if_not_exists()
                    .col(id_column(manager, Pucks::Id)?)
                    .col(ColumnDef::new(Pucks::PuckTypeId).uuid().not_null())
                    .col(ColumnDef::new(Pucks::Timestamp).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pucks_puck_type_id")
                            .from(Pucks::Table, Pucks::PuckTypeId)
                            .to(PuckTypes::Table, PuckTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pins::Table)
                    .if_not_exists()
                    .col(id_column(manager, Pins::Id)?)
                    .col(ColumnDef::new(Pins::PuckId).uuid().not_null())
                    .col(
                        ColumnDef::new(Pins::Position)
                            .integer()
                            .not_null()
                            .check(Expr::col(Pins::Position).between(1, 16)),
                    )
                    .col(
                        ColumnDef::new(Pins::XtalWellId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Pins::TimeDeparture).timestamp())
                    .col(ColumnDef::new(Pins::PickDuration).string())
                    .col(
                        ColumnDef::new(Pins::XrayStatus)
                            .string()
                            .not_null()
                            .default("not_collected"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pins_puck_id")
                            .from(Pins::Table, Pins::PuckId)
                            .to(Pucks::Table, Pucks::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pins_xtal_well_id")
                            .from(Pins::Table, Pins::XtalWellId)
                            .to(XtalWells::Table, XtalWells::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order
        manager
            .drop_table(Table::drop().table(Pins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pucks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PuckTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(XtalWells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(XtalPlates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DropPositions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(XtalPlateTypeWellTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(XtalWellTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(XtalPlateTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WellMaps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryWells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryPlates::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(LibraryPlateTypeWellTypes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryWellTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryPlateTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

// All table identifiers
#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Target,
    ProposalId,
    Year,
    Cycle,
    Visit,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum LibraryPlateTypes {
    Table,
    Id,
    Name,
    Rows,
    Columns,
}

#[derive(DeriveIden)]
enum LibraryWellTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum LibraryPlateTypeWellTypes {
    Table,
    PlateTypeId,
    WellTypeId,
}

#[derive(DeriveIden)]
enum LibraryPlates {
    Table,
    Id,
    Name,
    PlateTypeId,
}

#[derive(DeriveIden)]
enum LibraryWells {
    Table,
    Id,
    PlateId,
    WellTypeId,
    Used,
    CatalogId,
    Smiles,
    Sequence,
}

#[derive(DeriveIden)]
enum WellMaps {
    Table,
    Id,
    WellPosX,
    WellPosY,
    Echo,
    Shifter,
}

#[derive(DeriveIden)]
enum XtalPlateTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum XtalWellTypes {
    Table,
    Id,
    Name,
    WellMapId,
}

#[derive(DeriveIden)]
enum XtalPlateTypeWellTypes {
    Table,
    PlateTypeId,
    WellTypeId,
}

#[derive(DeriveIden)]
enum DropPositions {
    Table,
    Id,
    Name,
    XOffset,
    YOffset,
}

#[derive(DeriveIden)]
enum XtalPlates {
    Table,
    Id,
    Name,
    PlateTypeId,
}

#[derive(DeriveIden)]
enum XtalWells {
    Table,
    Id,
    PlateId,
    WellTypeId,
    DropPositionId,
    HarvestingStatus,
    Sequence,
    TimeArrival,
    HarvestComment,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    Name,
    ProjectId,
    Timestamp,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    BatchId,
    FromWellId,
    ToWellId,
    TransferVolume,
    Timestamp,
}

#[derive(DeriveIden)]
enum PuckTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Pucks {
    Table,
    Id,
    PuckTypeId,
    Timestamp,
}

#[derive(DeriveIden)]
enum Pins {
    Table,
    Id,
    PuckId,
    Position,
    XtalWellId,
    TimeDeparture,
    PickDuration,
    XrayStatus,
}
