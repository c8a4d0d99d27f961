//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, text lengths and slug/username/email formats are enforced at
//! the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum length of titles and names stored in `TEXT` columns.
pub const MAX_TITLE_LENGTH: usize = 256;
/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded the allowed number of characters.
    #[error("{0} must be at most {1} characters long")]
    TooLong(&'static str, usize),
    /// A slug contained characters outside `[A-Za-z0-9_-]`.
    #[error("slug may contain only latin letters, digits, hyphens and underscores")]
    InvalidSlug,
    /// A username contained characters outside letters, digits and `@.+-_`.
    #[error("username may contain only letters, digits and @/./+/-/_")]
    InvalidUsername,
    /// Email validation failed.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

fn require_max_length(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, TypeConstraintError> {
    if value.chars().count() > max {
        Err(TypeConstraintError::TooLong(field, max))
    } else {
        Ok(value)
    }
}

/// Shared accessors and conversions for string newtypes.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Non-empty trimmed text with an optional upper bound on length.
macro_rules! text_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
    ($name:ident, $doc:expr, $field:expr, $max:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value no longer than the field limit.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                require_max_length(trimmed, $field, $max).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(UserId, "Unique identifier for a user account.", "user_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(
    LocationId,
    "Unique identifier for a location.",
    "location_id"
);
id_newtype!(PostId, "Unique identifier for a post.", "post_id");
id_newtype!(CommentId, "Unique identifier for a comment.", "comment_id");

text_newtype!(
    CategoryTitle,
    "Category heading shown on the category feed.",
    "title",
    MAX_TITLE_LENGTH
);
text_newtype!(
    CategoryDescription,
    "Free-form category description.",
    "description"
);
text_newtype!(
    LocationName,
    "Name of a place a post refers to.",
    "location name",
    MAX_TITLE_LENGTH
);
text_newtype!(PostTitle, "Post heading.", "title", MAX_TITLE_LENGTH);
text_newtype!(PostText, "Post body.", "text");
text_newtype!(CommentText, "Comment body.", "text");

/// URL identifier of a category.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategorySlug(String);

impl CategorySlug {
    /// Accepts latin letters, digits, hyphens and underscores only.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "slug")?;
        let trimmed = require_max_length(trimmed, "slug", 50)?;
        if trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Ok(Self(trimmed))
        } else {
            Err(TypeConstraintError::InvalidSlug)
        }
    }
}

string_newtype_impls!(CategorySlug);

/// Login name of a user account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Accepts letters, digits and `@ . + - _`, up to 150 characters.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "username")?;
        let trimmed = require_max_length(trimmed, "username", MAX_USERNAME_LENGTH)?;
        if trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            Ok(Self(trimmed))
        } else {
            Err(TypeConstraintError::InvalidUsername)
        }
    }
}

string_newtype_impls!(Username);

/// Optional contact address; the empty string means "not set".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Trims the input; a non-empty value must be a valid address.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() || trimmed.as_str().validate_email() {
            Ok(Self(trimmed))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    /// Whether an address has been provided.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

string_newtype_impls!(Email);

/// Path of an uploaded image relative to the media root, e.g. `posts/<uuid>.png`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImagePath(String);

impl ImagePath {
    /// Rejects absolute paths and parent-directory components.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "image")?;
        if trimmed.starts_with('/') || trimmed.split('/').any(|part| part == "..") {
            return Err(TypeConstraintError::InvalidValue(format!(
                "image path: {trimmed}"
            )));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(ImagePath);
