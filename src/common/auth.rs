use crate::common::state::AppState;
use axum_keycloak_auth::{PassthroughMode, layer::KeycloakAuthLayer};
use utoipa_axum::router::OpenApiRouter;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Role {
    Administrator,
    Unknown(String),
}

impl axum_keycloak_auth::role::Role for Role {}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => f.write_str(&crate::config::admin_role()),
            Role::Unknown(unknown) => f.write_fmt(format_args!("Unknown role: {unknown}")),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == crate::config::admin_role() {
            Role::Administrator
        } else {
            Role::Unknown(value)
        }
    }
}

/// Wraps a mutating router in the Keycloak layer when auth is configured.
pub fn protect(router: OpenApiRouter, state: &AppState, resource: &str) -> OpenApiRouter {
    if let Some(instance) = state.keycloak_auth_instance.clone() {
        router.layer(
            KeycloakAuthLayer::<Role>::builder()
                .instance(instance)
                .passthrough_mode(PassthroughMode::Block)
                .persist_raw_claims(false)
                .expected_audiences(vec![String::from("account")])
                .required_roles(vec![Role::Administrator])
                .build(),
        )
    } else {
        if !state.config.tests_running {
            tracing::warn!("Mutating routes of {resource} router are not protected");
        }
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_round_trips_through_string() {
        let role = Role::from(crate::config::admin_role());
        assert_eq!(role, Role::Administrator);
        assert_eq!(role.to_string(), crate::config::admin_role());
    }

    #[test]
    fn test_other_roles_are_unknown() {
        let role = Role::from("offline_access".to_string());
        assert_eq!(role, Role::Unknown("offline_access".to_string()));
        assert_eq!(role.to_string(), "Unknown role: offline_access");
    }
}
