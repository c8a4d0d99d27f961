//! Post detail and the author-only create/update/delete lifecycle.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::post::PostWithRelations;
use crate::domain::types::{ImagePath, PostId};
use crate::dto::blog::{PostDetail, PostFormChoices};
use crate::forms::posts::PostFormPayload;
use crate::repository::{CategoryReader, CommentReader, LocationReader, PostReader, PostWriter};

use super::{ServiceError, ServiceResult, ensure_author};

fn parse_post_id(post_id: i32) -> ServiceResult<PostId> {
    PostId::new(post_id).map_err(|_| ServiceError::NotFound)
}

fn fetch_post<R>(post_id: PostId, repo: &R) -> ServiceResult<PostWithRelations>
where
    R: PostReader,
{
    match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post {post_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// The category must exist and the location, when given, too.
pub fn check_post_references<R>(payload: &PostFormPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + LocationReader,
{
    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::Form("Выбранная категория не найдена.".into())),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if let Some(location_id) = payload.location_id {
        match repo.get_location_by_id(location_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Form(
                    "Выбранное местоположение не найдено.".into(),
                ));
            }
            Err(e) => {
                log::error!("Failed to get location: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    Ok(())
}

/// A live post with its comments. Posts that are not live are hidden from
/// everyone, their author included.
pub fn show_post<R>(post_id: i32, repo: &R) -> ServiceResult<PostDetail>
where
    R: PostReader + CommentReader,
{
    let post_id = parse_post_id(post_id)?;
    let post = fetch_post(post_id, repo)?;

    if !post.is_live(Utc::now().naive_utc()) {
        return Err(ServiceError::NotFound);
    }

    match repo.list_comments(post_id) {
        Ok(comments) => Ok(PostDetail { post, comments }),
        Err(e) => {
            log::error!("Failed to list comments of post {post_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories and locations offered by the post form.
pub fn post_form_choices<R>(repo: &R) -> ServiceResult<PostFormChoices>
where
    R: CategoryReader + LocationReader,
{
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let locations = repo.list_locations().map_err(|e| {
        log::error!("Failed to list locations: {e}");
        ServiceError::Internal
    })?;

    Ok(PostFormChoices {
        categories,
        locations,
    })
}

/// Publish a new post authored by `user`.
pub fn create_post<R>(
    payload: PostFormPayload,
    image: Option<ImagePath>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PostId>
where
    R: CategoryReader + LocationReader + PostWriter,
{
    check_post_references(&payload, repo)?;

    let post = payload.into_new_post(user.id, image);
    match repo.create_post(&post) {
        Ok(id) => {
            log::info!("User {} created post {id}", user.id);
            Ok(id)
        }
        Err(e) => {
            log::error!("Failed to create post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Load a post its author is about to edit or delete.
pub fn load_post_for_edit<R>(
    post_id: i32,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<PostWithRelations>
where
    R: PostReader,
{
    let post = fetch_post(parse_post_id(post_id)?, repo)?;
    ensure_author(user, &post)?;
    Ok(post)
}

pub fn update_post<R>(
    post_id: i32,
    payload: PostFormPayload,
    image: Option<ImagePath>,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<PostId>
where
    R: PostReader + PostWriter + CategoryReader + LocationReader,
{
    let post = load_post_for_edit(post_id, user, repo)?;
    check_post_references(&payload, repo)?;

    let update = payload.into_update(image);
    match repo.update_post(post.post.id, &update) {
        Ok(_) => Ok(post.post.id),
        Err(e) => {
            log::error!("Failed to update post {}: {e}", post.post.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a post and its comments.
pub fn delete_post<R>(post_id: i32, user: Option<&AuthenticatedUser>, repo: &R) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let post = load_post_for_edit(post_id, user, repo)?;

    match repo.delete_post(post.post.id) {
        Ok(_) => {
            log::info!("Post {} deleted by its author", post.post.id);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete post {}: {e}", post.post.id);
            Err(ServiceError::Internal)
        }
    }
}
