use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{NewPost as DomainNewPost, Post as DomainPost};
use crate::domain::types::{ImagePath, PostText, PostTitle, TypeConstraintError};

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub category_id: i32,
    pub location_id: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub pub_date: NaiveDateTime,
    pub image: Option<&'a str>,
    pub is_published: bool,
    pub author_id: i32,
    pub category_id: i32,
    pub location_id: Option<i32>,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            title: PostTitle::new(post.title)?,
            text: PostText::new(post.text)?,
            pub_date: post.pub_date,
            image: post.image.map(ImagePath::new).transpose()?,
            is_published: post.is_published,
            created_at: post.created_at,
            author_id: post.author_id.try_into()?,
            category_id: post.category_id.try_into()?,
            location_id: post.location_id.map(TryInto::try_into).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewPost> for NewPost<'a> {
    fn from(post: &'a DomainNewPost) -> Self {
        Self {
            title: post.title.as_str(),
            text: post.text.as_str(),
            pub_date: post.pub_date,
            image: post.image.as_ref().map(ImagePath::as_str),
            is_published: post.is_published,
            author_id: post.author_id.get(),
            category_id: post.category_id.get(),
            location_id: post.location_id.map(|id| id.get()),
        }
    }
}
