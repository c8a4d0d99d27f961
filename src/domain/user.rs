use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, UserId, Username};

/// Public part of a user account. The password hash never leaves the
/// repository except through [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

impl User {
    /// "First Last" when either is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_string()
        }
    }
}

/// Account together with its stored argon2 hash, used for login checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Data required to register a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
}

/// Editable profile fields of an existing account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub username: Username,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}
