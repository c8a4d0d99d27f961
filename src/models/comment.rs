use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentText, TypeConstraintError};

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub post_id: i32,
    pub author_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub text: &'a str,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Comment> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            text: CommentText::new(comment.text)?,
            is_published: comment.is_published,
            created_at: comment.created_at,
            post_id: comment.post_id.try_into()?,
            author_id: comment.author_id.try_into()?,
        })
    }
}

impl<'a> NewComment<'a> {
    pub fn from_domain(comment: &'a DomainNewComment, created_at: NaiveDateTime) -> Self {
        Self {
            text: comment.text.as_str(),
            post_id: comment.post_id.get(),
            author_id: comment.author_id.get(),
            created_at,
        }
    }
}
