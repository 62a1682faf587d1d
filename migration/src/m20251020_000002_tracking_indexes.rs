use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============ WELL TYPE LOOKUPS ============
        // Ingestion resolves well types by name for every row
        manager
            .create_index(
                Index::create()
                    .name("idx_library_well_types_name")
                    .table(LibraryWellTypes::Table)
                    .col(LibraryWellTypes::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_xtal_well_types_name")
                    .table(XtalWellTypes::Table)
                    .col(XtalWellTypes::Name)
                    .to_owned(),
            )
            .await?;

        // ============ POOL SELECTION ============
        manager
            .create_index(
                Index::create()
                    .name("idx_library_wells_used")
                    .table(LibraryWells::Table)
                    .col(LibraryWells::Used)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_xtal_wells_harvesting_status")
                    .table(XtalWells::Table)
                    .col(XtalWells::HarvestingStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfers_from_well_id")
                    .table(Transfers::Table)
                    .col(Transfers::FromWellId)
                    .to_owned(),
            )
            .await?;

        // ============ EXPORTS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_transfers_batch_id")
                    .table(Transfers::Table)
                    .col(Transfers::BatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pins_puck_id")
                    .table(Pins::Table)
                    .col(Pins::PuckId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_pins_puck_id").table(Pins::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transfers_batch_id")
                    .table(Transfers::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transfers_from_well_id")
                    .table(Transfers::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_xtal_wells_harvesting_status")
                    .table(XtalWells::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_library_wells_used")
                    .table(LibraryWells::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_xtal_well_types_name")
                    .table(XtalWellTypes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_library_well_types_name")
                    .table(LibraryWellTypes::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LibraryWellTypes {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum XtalWellTypes {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum LibraryWells {
    Table,
    Used,
}

#[derive(DeriveIden)]
enum XtalWells {
    Table,
    HarvestingStatus,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    BatchId,
    FromWellId,
}

#[derive(DeriveIden)]
enum Pins {
    Table,
    PuckId,
}
