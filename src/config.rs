use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

pub const DEFAULT_ADMIN_ROLE: &str = "xtal-admin";
pub const DEFAULT_DROP_ZONE_OFFSET_MICRONS: i32 = 300;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub keycloak_ui_id: String,
    pub keycloak_url: String,
    pub keycloak_realm: String,
    pub deployment: String,
    pub admin_role: String,
    /// Step between the centre of a crystal well and an off-centre drop zone
    pub drop_zone_offset_microns: i32,
    pub listen_addr: String,
    pub tests_running: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available
        let db_url = env::var("DB_URL").ok().or_else(|| {
            Some(format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                env::var("DB_USER").expect("DB_USER must be set"),
                env::var("DB_PASSWORD").expect("DB_PASSWORD must be set"),
                env::var("DB_HOST").expect("DB_HOST must be set"),
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").expect("DB_NAME must be set"),
            ))
        });

        let drop_zone_offset_microns = env::var("DROP_ZONE_OFFSET_MICRONS")
            .ok()
            .map(|value| {
                value
                    .parse::<i32>()
                    .expect("DROP_ZONE_OFFSET_MICRONS must be an integer")
            })
            .unwrap_or(DEFAULT_DROP_ZONE_OFFSET_MICRONS);

        Config {
            app_name: env::var("APP_NAME").expect("APP_NAME must be set"),
            keycloak_ui_id: env::var("KEYCLOAK_UI_ID").expect("KEYCLOAK_UI_ID must be set"),
            keycloak_url: env::var("KEYCLOAK_URL").expect("KEYCLOAK_URL must be set"),
            keycloak_realm: env::var("KEYCLOAK_REALM").expect("KEYCLOAK_REALM must be set"),
            deployment: env::var("DEPLOYMENT")
                .expect("DEPLOYMENT must be set, this can be local, dev, stage, or prod"),
            admin_role: admin_role(),
            drop_zone_offset_microns,
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            tests_running: false,
            db_url,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "xtal-api-test".to_string(),
            keycloak_ui_id: "test-ui".to_string(),
            keycloak_url: String::new(),
            keycloak_realm: "test-realm".to_string(),
            deployment: "test".to_string(),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
            drop_zone_offset_microns: DEFAULT_DROP_ZONE_OFFSET_MICRONS,
            listen_addr: "127.0.0.1:0".to_string(),
            tests_running: true,
            db_url: Some("sqlite::memory:".to_string()),
        }
    }
}

/// Keycloak role that unlocks mutating routes.
pub fn admin_role() -> String {
    env::var("ADMIN_ROLE").unwrap_or_else(|_| DEFAULT_ADMIN_ROLE.to_string())
}
