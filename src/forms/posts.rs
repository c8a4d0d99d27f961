use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::post::{ImageChange, NewPost, PostUpdate, PostWithRelations};
use crate::domain::types::{
    CategoryId, ImagePath, LocationId, PostText, PostTitle, TypeConstraintError, UserId,
};

/// Formats accepted for the `pub_date` field. The first one is what a
/// `datetime-local` input submits.
const PUB_DATE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Format used to pre-fill the `pub_date` input.
pub const PUB_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn parse_pub_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    PUB_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Raw multipart submission of the post create/edit form.
///
/// Every field is optional here so that a missing value or an oversized
/// image re-renders the form instead of failing extraction.
#[derive(MultipartForm)]
pub struct PostMultipartForm {
    pub title: Option<Text<String>>,
    pub text: Option<Text<String>>,
    pub pub_date: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub location: Option<Text<String>>,
    pub image_clear: Option<Text<String>>,
    pub image: Option<TempFile>,
}

fn text_or_empty(field: Option<Text<String>>) -> String {
    field.map(Text::into_inner).unwrap_or_default()
}

impl PostMultipartForm {
    /// Split the submission into its text fields and the uploaded file, if
    /// one was actually selected.
    pub fn into_parts(self) -> (PostForm, Option<TempFile>) {
        let form = PostForm {
            title: text_or_empty(self.title),
            text: text_or_empty(self.text),
            pub_date: text_or_empty(self.pub_date),
            category: text_or_empty(self.category),
            location: text_or_empty(self.location),
            image_clear: self.image_clear.is_some(),
        };
        let image = self.image.filter(|file| file.size > 0);
        (form, image)
    }
}

/// Text fields of the post form. Also used to re-render the form with the
/// submitted values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub pub_date: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_clear: bool,
}

impl PostForm {
    /// Pre-filled form for editing an existing post.
    pub fn from_post(post: &PostWithRelations) -> Self {
        Self {
            title: post.post.title.to_string(),
            text: post.post.text.to_string(),
            pub_date: post
                .post
                .pub_date
                .format(PUB_DATE_INPUT_FORMAT)
                .to_string(),
            category: post.post.category_id.to_string(),
            location: post
                .post
                .location_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            image_clear: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
    pub clear_image: bool,
}

impl PostFormPayload {
    /// New posts are published immediately unless dated in the future.
    pub fn into_new_post(self, author_id: UserId, image: Option<ImagePath>) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            image,
            is_published: true,
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }

    /// A freshly uploaded image wins over the clear checkbox.
    pub fn into_update(self, image: Option<ImagePath>) -> PostUpdate {
        let image = match image {
            Some(path) => ImageChange::Replace(path),
            None if self.clear_image => ImageChange::Clear,
            None => ImageChange::Keep,
        };
        PostUpdate {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            category_id: self.category_id,
            location_id: self.location_id,
            image,
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Заполните обязательные поля: {0}")]
    Validation(String),
    #[error("Некорректные данные: {0}")]
    TypeConstraint(String),
    #[error("Некорректная дата публикации.")]
    InvalidDate,
    #[error("Выберите {0} из списка.")]
    InvalidChoice(&'static str),
}

impl From<ValidationErrors> for PostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PostForm> for PostFormPayload {
    type Error = PostFormError;

    fn try_from(value: PostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let pub_date = parse_pub_date(&value.pub_date).ok_or(PostFormError::InvalidDate)?;

        let category_id = value
            .category
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|id| CategoryId::new(id).ok())
            .ok_or(PostFormError::InvalidChoice("категорию"))?;

        let location = value.location.trim();
        let location_id = if location.is_empty() {
            None
        } else {
            let id = location
                .parse::<i32>()
                .ok()
                .and_then(|id| LocationId::new(id).ok())
                .ok_or(PostFormError::InvalidChoice("местоположение"))?;
            Some(id)
        };

        Ok(Self {
            title: PostTitle::new(value.title)?,
            text: PostText::new(value.text)?,
            pub_date,
            category_id,
            location_id,
            clear_image: value.image_clear,
        })
    }
}
