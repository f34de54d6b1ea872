use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    Forbidden(String),

    /// Foreign key violation on write
    #[error("Referenced entity does not exist")]
    MissingReference,

    /// Unique index violation on write
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

impl SchedulingError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }
}

impl From<DbErr> for SchedulingError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::MissingReference,
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("Resource already exists".to_string())
            }
            _ => Self::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<DatabaseError> for SchedulingError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => Self::NotFound { entity, id },
            DatabaseError::Postgres(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Convert SchedulingError to AppError for standardized error responses
impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound { .. } | SchedulingError::MissingReference => {
                AppError::NotFound(err.to_string())
            }
            SchedulingError::Forbidden(msg) => AppError::Forbidden(msg),
            SchedulingError::Conflict(msg) => AppError::Conflict(msg),
            SchedulingError::Validation(errors) => AppError::ValidationError(errors),
            SchedulingError::InvalidCredentials => AppError::BadRequest(err.to_string()),
            SchedulingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
