//! Registration, login, password change and profile editing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::Email;
use crate::domain::user::{NewUser, User};
use crate::forms::accounts::{
    LoginFormPayload, PasswordChangeFormPayload, ProfileFormPayload, RegistrationFormPayload,
};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";

/// Hash `password` into a PHC string with a random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

pub fn register<R>(payload: RegistrationFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserWriter,
{
    let user = NewUser {
        username: payload.username,
        email: Email::default(),
        password_hash: hash_password(&payload.password)?,
    };

    match repo.create_user(&user) {
        Ok(user) => {
            log::info!("Registered user {}", user.username);
            Ok(user)
        }
        Err(RepositoryError::ConstraintViolation(_)) => {
            Err(ServiceError::Form(USERNAME_TAKEN.into()))
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Resolve login credentials to the identity stored in the session.
pub fn authenticate<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let invalid = || ServiceError::Form("Неверное имя пользователя или пароль.".into());

    let credentials = match repo.get_credentials(&payload.username) {
        Ok(Some(credentials)) => credentials,
        Ok(None) => return Err(invalid()),
        Err(e) => {
            log::error!("Failed to get credentials: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !credentials.user.is_active
        || !verify_password(&payload.password, &credentials.password_hash)
    {
        log::warn!("Failed login attempt for {}", payload.username);
        return Err(invalid());
    }

    Ok(AuthenticatedUser::from(&credentials.user))
}

pub fn change_password<R>(
    payload: PasswordChangeFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let credentials = match repo.get_credentials(&user.username) {
        Ok(Some(credentials)) if credentials.user.id == user.id => credentials,
        Ok(_) => return Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to get credentials: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&payload.old_password, &credentials.password_hash) {
        return Err(ServiceError::Form("Текущий пароль введён неверно.".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    match repo.set_password_hash(user.id, &hash) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to store password hash: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn load_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    match repo.get_user_by_id(user.id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to get user {}: {e}", user.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Update the acting user's profile and return the refreshed identity.
pub fn update_profile<R>(
    payload: ProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + UserWriter,
{
    match repo.update_user(user.id, &payload.into_update()) {
        Ok(0) => return Err(ServiceError::Unauthorized),
        Ok(_) => {}
        Err(RepositoryError::ConstraintViolation(_)) => {
            return Err(ServiceError::Form(USERNAME_TAKEN.into()));
        }
        Err(e) => {
            log::error!("Failed to update user {}: {e}", user.id);
            return Err(ServiceError::Internal);
        }
    }

    load_profile(user, repo).map(|user| AuthenticatedUser::from(&user))
}
