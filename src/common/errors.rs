use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use std::fmt;

/// Failures raised while tracking plates, transfers and harvests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// A named plate, well type, puck or drop position does not exist (404)
    ReferenceNotFound { resource: String, id: String },
    /// A unique, foreign-key or range constraint rejected the unit of work (409)
    ConstraintViolation { constraint: String, message: String },
    /// The request or uploaded file has the wrong shape (400)
    InputShape { field: String, message: String },
    /// Reference data is misconfigured, e.g. an unknown drop-zone code (422)
    Configuration { message: String },
    /// Stored data breaks an invariant the service relies on (500)
    DataIntegrity { message: String },
    /// Any other database failure (500)
    Database { message: String },
}

impl TrackingError {
    fn kind(&self) -> &'static str {
        match self {
            TrackingError::ReferenceNotFound { .. } => "ReferenceNotFound",
            TrackingError::ConstraintViolation { .. } => "ConstraintViolation",
            TrackingError::InputShape { .. } => "InputShape",
            TrackingError::Configuration { .. } => "Configuration",
            TrackingError::DataIntegrity { .. } => "DataIntegrity",
            TrackingError::Database { .. } => "Database",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TrackingError::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
            TrackingError::ConstraintViolation { .. } => StatusCode::CONFLICT,
            TrackingError::InputShape { .. } => StatusCode::BAD_REQUEST,
            TrackingError::Configuration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TrackingError::DataIntegrity { .. } | TrackingError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            TrackingError::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
            TrackingError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            TrackingError::InputShape { .. } => "INPUT_SHAPE_ERROR",
            TrackingError::Configuration { .. } => "CONFIGURATION_ERROR",
            TrackingError::DataIntegrity { .. } => "DATA_INTEGRITY_ERROR",
            TrackingError::Database { .. } => "DATABASE_ERROR",
        }
    }
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::ReferenceNotFound { resource, id } => {
                write!(f, "{resource} '{id}' not found")
            }
            TrackingError::ConstraintViolation {
                constraint,
                message,
            } => write!(f, "Constraint '{constraint}' violated: {message}"),
            TrackingError::InputShape { field, message } => {
                write!(f, "Invalid input in '{field}': {message}")
            }
            TrackingError::Configuration { message } => {
                write!(f, "Configuration error: {message}")
            }
            TrackingError::DataIntegrity { message } => {
                write!(f, "Data integrity error: {message}")
            }
            TrackingError::Database { message } => write!(f, "Database error: {message}"),
        }
    }
}

impl std::error::Error for TrackingError {}

impl IntoResponse for TrackingError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "type": self.kind(),
            }
        }));

        (self.status(), body).into_response()
    }
}

impl From<DbErr> for TrackingError {
    fn from(err: DbErr) -> Self {
        ErrorMapper::map_db_error(err, "record")
    }
}

/// Classifies sea-orm errors into tracking errors
pub struct ErrorMapper;

impl ErrorMapper {
    pub fn map_db_error(err: DbErr, context: &str) -> TrackingError {
        if let Some(sql_err) = err.sql_err() {
            return match sql_err {
                SqlErr::UniqueConstraintViolation(message) => TrackingError::ConstraintViolation {
                    constraint: format!("{context}_unique"),
                    message,
                },
                SqlErr::ForeignKeyConstraintViolation(message) => {
                    TrackingError::ConstraintViolation {
                        constraint: format!("{context}_foreign_key"),
                        message,
                    }
                }
                other => TrackingError::Database {
                    message: other.to_string(),
                },
            };
        }

        match err {
            DbErr::RecordNotFound(message) => TrackingError::ReferenceNotFound {
                resource: context.replace('_', " "),
                id: Self::extract_id_from_message(&message),
            },
            DbErr::Custom(message) if message.starts_with("Validation failed:") => {
                let detail = message.trim_start_matches("Validation failed:").trim();
                TrackingError::InputShape {
                    field: detail
                        .split_whitespace()
                        .next()
                        .unwrap_or("unknown")
                        .to_string(),
                    message: detail.to_string(),
                }
            }
            other => {
                let message = other.to_string();
                if Self::is_check_violation(&message) {
                    TrackingError::ConstraintViolation {
                        constraint: format!("{context}_check"),
                        message,
                    }
                } else {
                    TrackingError::Database { message }
                }
            }
        }
    }

    /// SQLite and PostgreSQL phrase CHECK failures differently
    fn is_check_violation(message: &str) -> bool {
        message.contains("CHECK constraint failed") || message.contains("violates check constraint")
    }

    fn extract_id_from_message(message: &str) -> String {
        message
            .split_whitespace()
            .map(|word| word.trim_matches(|c| c == '\'' || c == '"'))
            .find(|word| uuid::Uuid::parse_str(word).is_ok())
            .map_or_else(|| "unknown".to_string(), str::to_string)
    }
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::TrackingError::ReferenceNotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! constraint_violation {
    ($constraint:expr, $message:expr) => {
        $crate::common::errors::TrackingError::ConstraintViolation {
            constraint: $constraint.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! input_shape_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::TrackingError::InputShape {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

pub trait DbErrorExt {
    fn to_tracking_error(self, context: &str) -> TrackingError;
}

impl DbErrorExt for DbErr {
    fn to_tracking_error(self, context: &str) -> TrackingError {
        ErrorMapper::map_db_error(self, context)
    }
}

pub type TrackingResult<T> = Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_build_expected_variants() {
        let err = crate::input_shape_error!("count", "must be positive");
        assert_eq!(
            err,
            TrackingError::InputShape {
                field: "count".to_string(),
                message: "must be positive".to_string()
            }
        );
        assert!(matches!(
            crate::not_found!("xtal plate", "P1"),
            TrackingError::ReferenceNotFound { .. }
        ));
        assert!(matches!(
            crate::constraint_violation!("pins_xtal_well_unique", "duplicate"),
            TrackingError::ConstraintViolation { .. }
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            crate::not_found!("plate", "x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            crate::constraint_violation!("c", "m").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            crate::input_shape_error!("f", "m").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TrackingError::Configuration {
                message: "m".to_string()
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            TrackingError::DataIntegrity {
                message: "m".to_string()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_mapper_validation() {
        let db_err = DbErr::Custom("Validation failed: cycle must be between 1 and 3".to_string());
        match ErrorMapper::map_db_error(db_err, "project") {
            TrackingError::InputShape { field, message } => {
                assert_eq!(field, "cycle");
                assert!(message.contains("between 1 and 3"));
            }
            other => panic!("Expected input shape error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_mapper_not_found() {
        let id = uuid::Uuid::new_v4();
        let db_err = DbErr::RecordNotFound(format!("Batch with id '{id}' not found"));
        match db_err.to_tracking_error("batch") {
            TrackingError::ReferenceNotFound { resource, id: found } => {
                assert_eq!(resource, "batch");
                assert_eq!(found, id.to_string());
            }
            other => panic!("Expected not found error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_mapper_check_constraint_message() {
        let db_err = DbErr::Custom(
            "CHECK constraint failed: transfer_volume BETWEEN 5 AND 150".to_string(),
        );
        assert!(matches!(
            ErrorMapper::map_db_error(db_err, "transfers"),
            TrackingError::ConstraintViolation { .. }
        ));
    }
}
