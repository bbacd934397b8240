// src/error/types.rs
use crate::domain::video::ExclusivityError;
use crate::domain::{DomainError, EntityKind};
use rusqlite::{ffi, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    /// Field-level validation failure
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no document found with that ID")]
    NotFound,

    #[error("Related {0} not found")]
    ReferenceNotFound(EntityKind),

    #[error("Exclusivity error: {0}")]
    Exclusivity(#[from] ExclusivityError),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Shorthand for a validation failure that has no dedicated domain variant
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Domain(DomainError::InvariantViolation(message.into()))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation
                    && matches!(
                        failure.extended_code,
                        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    ) =>
            {
                AppError::DuplicateKey(
                    message
                        .clone()
                        .unwrap_or_else(|| "unique constraint violated".to_string()),
                )
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
