use pushkind_common::pagination::Paginated;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::comment::CommentWithAuthor;
use crate::domain::location::Location;
use crate::domain::post::PostWithRelations;
use crate::domain::user::User;

/// One page of a post listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostPage {
    pub items: Vec<PostWithRelations>,
    pub page: usize,
    /// Matching posts across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl PostPage {
    /// Paginator handed to templates as `page_obj`.
    pub fn into_paginated(self) -> Paginated<PostWithRelations> {
        Paginated::new(self.items, self.page, self.total_pages)
    }
}

/// A page of the category feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryFeed {
    pub category: Category,
    pub posts: PostPage,
}

/// A page of a user's profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileFeed {
    pub profile: User,
    /// The viewer is looking at their own profile.
    pub is_owner: bool,
    pub posts: PostPage,
}

/// A single post with its comments, oldest first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostDetail {
    pub post: PostWithRelations,
    pub comments: Vec<CommentWithAuthor>,
}

/// Options for the category and location selects of the post form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostFormChoices {
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}
