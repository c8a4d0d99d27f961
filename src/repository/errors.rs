use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Failures raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No connection could be taken from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A unique or foreign-key constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// A stored row did not satisfy domain constraints.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => RepositoryError::ConstraintViolation(info.message().to_string()),
            other => RepositoryError::Database(other),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
