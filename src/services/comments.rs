use crate::domain::auth::AuthenticatedUser;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::forms::comments::CommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader};

use super::{ServiceError, ServiceResult, ensure_author};

fn parse_ids(post_id: i32, comment_id: i32) -> ServiceResult<(PostId, CommentId)> {
    let post_id = PostId::new(post_id).map_err(|_| ServiceError::NotFound)?;
    let comment_id = CommentId::new(comment_id).map_err(|_| ServiceError::NotFound)?;
    Ok((post_id, comment_id))
}

/// Comment on an existing post.
pub fn add_comment<R>(
    post_id: i32,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CommentId>
where
    R: PostReader + CommentWriter,
{
    let post_id = PostId::new(post_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_post_by_id(post_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post {post_id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let comment = NewComment {
        text: payload.text,
        post_id,
        author_id: user.id,
    };
    match repo.create_comment(&comment) {
        Ok(id) => Ok(id),
        Err(e) => {
            log::error!("Failed to create comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Load a comment of `post_id` its author is about to edit or delete.
/// A comment that belongs to another post is reported as missing.
pub fn load_comment_for_edit<R>(
    post_id: i32,
    comment_id: i32,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: CommentReader,
{
    let (post_id, comment_id) = parse_ids(post_id, comment_id)?;

    let comment = match repo.get_comment(post_id, comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get comment {comment_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    ensure_author(user, &comment)?;
    Ok(comment)
}

pub fn update_comment<R>(
    post_id: i32,
    comment_id: i32,
    payload: CommentFormPayload,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let comment = load_comment_for_edit(post_id, comment_id, user, repo)?;

    match repo.update_comment(comment.post_id, comment.id, &payload.text) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update comment {}: {e}", comment.id);
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_comment<R>(
    post_id: i32,
    comment_id: i32,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let comment = load_comment_for_edit(post_id, comment_id, user, repo)?;

    match repo.delete_comment(comment.post_id, comment.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete comment {}: {e}", comment.id);
            Err(ServiceError::Internal)
        }
    }
}
