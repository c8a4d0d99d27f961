use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, TypeConstraintError, Username};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser, UserCredentials};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            email: Email::new(user.email)?,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            date_joined: user.date_joined,
        })
    }
}

impl TryFrom<User> for UserCredentials {
    type Error = TypeConstraintError;

    fn try_from(mut user: User) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut user.password_hash);
        Ok(Self {
            user: user.try_into()?,
            password_hash,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
        }
    }
}
