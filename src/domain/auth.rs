use serde::{Deserialize, Serialize};

use crate::domain::types::{UserId, Username};
use crate::domain::user::User;

/// Identity of the signed-in user carried in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
