use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::types::{CategoryId, ImagePath, LocationId, PostId, PostText, PostTitle, UserId};
use crate::domain::user::User;

/// A blog entry as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub text: PostText,
    /// Posts dated in the future stay hidden from the public until then.
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
}

/// A post joined with everything a feed or detail page shows next to it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostWithRelations {
    #[serde(flatten)]
    pub post: Post,
    pub category: Category,
    pub location: Option<Location>,
    pub author: User,
    pub comment_count: i64,
}

/// Information required to create a new [`Post`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub is_published: bool,
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
}

/// What to do with the stored image when a post is edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(ImagePath),
    Clear,
}

/// Author-editable fields of an existing post. The author itself is not
/// part of the update and therefore cannot change.
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
    pub image: ImageChange,
}
