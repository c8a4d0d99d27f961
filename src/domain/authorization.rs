//! Ownership checks for mutating posts and comments.

use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostWithRelations};
use crate::domain::types::UserId;

/// Resources that have exactly one, immutable author.
pub trait Authored {
    fn author_id(&self) -> UserId;
}

impl Authored for Post {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

impl Authored for PostWithRelations {
    fn author_id(&self) -> UserId {
        self.post.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

/// `true` only when `actor` is signed in and wrote `resource`.
pub fn is_author<R: Authored + ?Sized>(actor: Option<UserId>, resource: &R) -> bool {
    actor == Some(resource.author_id())
}
