use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentId, CommentText, PostId, UserId};
use crate::domain::user::User;

/// Reader's reply to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub text: CommentText,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub post_id: PostId,
    pub author_id: UserId,
}

/// Comment joined with its author for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: User,
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub text: CommentText,
    pub post_id: PostId,
    pub author_id: UserId,
}
