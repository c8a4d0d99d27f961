use diesel::prelude::*;

use crate::domain::types::{UserId, Username};
use crate::domain::user::{NewUser, User, UserCredentials, UserUpdate};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::{DieselRepository, RepositoryResult, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_credentials(&self, username: &Username) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.into();

        let created = diesel::insert_into(users::table)
            .values(db_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set((
                users::username.eq(update.username.as_str()),
                users::email.eq(update.email.as_str()),
                users::first_name.eq(update.first_name.as_str()),
                users::last_name.eq(update.last_name.as_str()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_password_hash(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(users::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
