//! Error conversion glue between the data layer and the service layer.
//!
//! The domain layer must not depend on service error types, so the
//! conversions live here and are only compiled with the `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::accounts::AccountFormError;
use crate::forms::comments::CommentFormError;
use crate::forms::posts::PostFormError;
use crate::media::MediaError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<PostFormError> for ServiceError {
    fn from(val: PostFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

/// Rejected uploads are shown on the form; storage failures are not.
impl From<MediaError> for ServiceError {
    fn from(val: MediaError) -> Self {
        match val {
            MediaError::UnsupportedExtension | MediaError::TooLarge => {
                ServiceError::Form(val.to_string())
            }
            err => {
                log::error!("Failed to store uploaded image: {err}");
                ServiceError::Internal
            }
        }
    }
}

impl From<CommentFormError> for ServiceError {
    fn from(val: CommentFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AccountFormError> for ServiceError {
    fn from(val: AccountFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
