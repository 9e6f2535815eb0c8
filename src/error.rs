use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure raised by a `MealStore` or `UserStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Maps a unique-constraint violation onto `Duplicate(field)`, leaving other errors as-is.
    pub fn from_insert(e: sqlx::Error, field: &'static str) -> Self {
        let unique_violation = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
        );
        if unique_violation {
            StoreError::Duplicate(field)
        } else {
            StoreError::Database(e)
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Sold out")]
    SoldOut,

    #[error("{0}")]
    Unavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Invalid(_) | AppError::SoldOut => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unavailable(what: &str, e: impl std::fmt::Display) -> Self {
        error!(error = %e, "{what} failed");
        AppError::Unavailable(format!("Failed to {what}"))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => {
                AppError::Conflict(format!("User with this {field} already exists"))
            }
            StoreError::Database(e) => {
                error!(error = %e, "store call failed");
                AppError::Unavailable("Store unavailable".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Invalid("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SoldOut.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unavailable("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_store_error_becomes_conflict() {
        let err: AppError = StoreError::Duplicate("email").into();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "User with this email already exists");
    }

    #[test]
    fn database_store_error_becomes_unavailable() {
        let err: AppError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[test]
    fn non_unique_insert_error_stays_database() {
        let err = StoreError::from_insert(sqlx::Error::RowNotFound, "email");
        assert!(matches!(err, StoreError::Database(_)));
    }
}
