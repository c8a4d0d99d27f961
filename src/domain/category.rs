use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategorySlug, CategoryTitle};

/// Thematic section posts are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: CategorySlug,
    /// Unpublished categories hide every post filed under them.
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: CategorySlug,
    pub is_published: bool,
}
