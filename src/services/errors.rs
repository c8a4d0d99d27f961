use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The operation requires a signed-in user.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found or is not visible to the viewer.
    #[error("not found")]
    NotFound,
    /// The acting user does not own the resource being changed.
    #[error("not the author")]
    NotAuthor,
    /// Submitted data was rejected; the message is shown to the user.
    #[error("{0}")]
    Form(String),
    /// A value failed domain type constraints.
    #[error("invalid data: {0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
