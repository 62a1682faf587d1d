mod common;
mod config;
mod routes;
mod services;

mod catalog;
mod exports;
mod geometry;
mod harvesting;
mod plates;
mod projects;
mod transfers;

#[cfg(test)]
mod test_helpers;

use crate::config::Config;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() {
    // Set up tracing/logging
    tracing_subscriber::fmt::init();

    // Load configuration and environment variables to pass to the application
    let config: Config = Config::from_env();
    tracing::info!(
        app = %config.app_name,
        deployment = %config.deployment.to_uppercase(),
        "Starting server"
    );

    let db: DatabaseConnection = Database::connect(
        config
            .db_url
            .as_deref()
            .expect("Database URL must be configured"),
    )
    .await
    .expect("Failed to connect to the database");

    if db.ping().await.is_ok() {
        tracing::info!("Connected to the database");
    } else {
        tracing::error!("Could not connect to the database");
    }

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("DB migrations complete");

    // Drop positions must exist before any crystal plate is ingested
    geometry::services::seed_drop_positions(&db, config.drop_zone_offset_microns)
        .await
        .expect("Failed to seed drop positions");

    let router = routes::build_router(&db, &config);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, router.into_make_service())
        .await
        .expect("Server error");
}
