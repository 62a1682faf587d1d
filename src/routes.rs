use crate::common::state::AppState;
use crate::config::Config;
use crate::{catalog, harvesting, plates, projects, transfers};
use axum::{Router, extract::DefaultBodyLimit};
use axum_keycloak_auth::{Url, instance::KeycloakAuthInstance, instance::KeycloakConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

fn keycloak_instance(config: &Config) -> Option<Arc<KeycloakAuthInstance>> {
    if config.keycloak_url.is_empty() {
        return None;
    }
    match Url::parse(&config.keycloak_url) {
        Ok(server) => Some(Arc::new(KeycloakAuthInstance::new(
            KeycloakConfig::builder()
                .server(server)
                .realm(String::from(&config.keycloak_realm))
                .build(),
        ))),
        Err(e) => {
            tracing::error!(url = %config.keycloak_url, error = %e, "Invalid KEYCLOAK_URL, authentication disabled");
            None
        }
    }
}

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        modifiers(&SecurityAddon),
        security(
            ("bearerAuth" = [])
        ),
        tags(
            (name = "catalog", description = "Plate types, well maps and drop positions"),
            (name = "plates", description = "Library and crystallization plates"),
            (name = "batches", description = "Transfer batches and their device exports"),
            (name = "harvests", description = "Harvest log ingestion")
        )
    )]
    struct ApiDoc;

    struct SecurityAddon;

    impl utoipa::Modify for SecurityAddon {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            if let Some(components) = openapi.components.as_mut() {
                components.add_security_scheme(
                    "bearerAuth",
                    utoipa::openapi::security::SecurityScheme::Http(
                        utoipa::openapi::security::HttpBuilder::new()
                            .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }
    }

    let app_state = AppState::new(db.clone(), config.clone(), keycloak_instance(config));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .nest("/api/projects", projects::views::router(&app_state))
        .nest("/api/catalog", catalog::views::router(&app_state))
        .nest("/api/plates", plates::views::router(&app_state))
        .nest("/api/batches", transfers::views::router(&app_state))
        .nest("/api/harvests", harvesting::views::router(&app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
}
