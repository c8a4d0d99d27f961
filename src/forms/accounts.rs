use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, TypeConstraintError, Username};
use crate::domain::user::{User, UserUpdate};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum AccountFormError {
    #[error("{0}")]
    Validation(String),
    #[error("Некорректные данные: {0}")]
    TypeConstraint(String),
    #[error("Пароли не совпадают.")]
    PasswordMismatch,
}

impl From<ValidationErrors> for AccountFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AccountFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Введите имя пользователя."))]
    pub username: String,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 1, message = "Введите пароль."))]
    pub password: String,
    /// Where to go after a successful login.
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = AccountFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, max = 150, message = "Имя пользователя: от 1 до 150 символов."))]
    pub username: String,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов."))]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationFormPayload {
    pub username: Username,
    pub password: String,
}

impl TryFrom<RegistrationForm> for RegistrationFormPayload {
    type Error = AccountFormError;

    fn try_from(value: RegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;
        if value.password1 != value.password2 {
            return Err(AccountFormError::PasswordMismatch);
        }
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password1,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PasswordChangeForm {
    #[validate(length(min = 1, message = "Введите текущий пароль."))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов."))]
    pub new_password1: String,
    pub new_password2: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordChangeFormPayload {
    pub old_password: String,
    pub new_password: String,
}

impl TryFrom<PasswordChangeForm> for PasswordChangeFormPayload {
    type Error = AccountFormError;

    fn try_from(value: PasswordChangeForm) -> Result<Self, Self::Error> {
        value.validate()?;
        if value.new_password1 != value.new_password2 {
            return Err(AccountFormError::PasswordMismatch);
        }
        Ok(Self {
            old_password: value.old_password,
            new_password: value.new_password1,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 150, message = "Имя: не более 150 символов."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Фамилия: не более 150 символов."))]
    pub last_name: String,
    #[validate(length(min = 1, max = 150, message = "Имя пользователя: от 1 до 150 символов."))]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.to_string(),
            email: user.email.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFormPayload {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub email: Email,
}

impl ProfileFormPayload {
    pub fn into_update(self) -> UserUpdate {
        UserUpdate {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

impl TryFrom<ProfileForm> for ProfileFormPayload {
    type Error = AccountFormError;

    fn try_from(value: ProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
            username: Username::new(value.username)?,
            email: Email::new(value.email)?,
        })
    }
}
