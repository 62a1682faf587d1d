pub use sea_orm_migration::prelude::*;

mod m20251020_000001_create_tracking_schema;
mod m20251020_000002_tracking_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_tracking_schema::Migration),
            Box::new(m20251020_000002_tracking_indexes::Migration),
        ]
    }
}
