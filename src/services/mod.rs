pub use errors::{ServiceError, ServiceResult};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::authorization::{Authored, is_author};

pub mod accounts;
pub mod comments;
pub mod errors;
pub mod listing;
pub mod posts;

/// Fail with [`ServiceError::NotAuthor`] unless `actor` wrote `resource`.
pub fn ensure_author<R>(actor: Option<&AuthenticatedUser>, resource: &R) -> ServiceResult<()>
where
    R: Authored + ?Sized,
{
    if is_author(actor.map(|user| user.id), resource) {
        Ok(())
    } else {
        Err(ServiceError::NotAuthor)
    }
}
