use diesel::connection::SimpleConnection;
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;

use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, PostUpdate, PostWithRelations};
use crate::domain::types::{
    CategoryId, CategorySlug, CommentId, CommentText, LocationId, PostId, UserId, Username,
};
use crate::domain::user::{NewUser, User, UserCredentials, UserUpdate};
use crate::domain::visibility::PostVisibility;

pub mod category;
pub mod comment;
pub mod errors;
pub mod location;
pub mod post;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection with foreign keys enforced.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        let mut conn = self.pool.get()?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }
}

/// Query parameters used when listing posts.
///
/// Defaults to every post of every author; feeds narrow it down with the
/// builder methods and must pick a [`PostVisibility`] explicitly.
#[derive(Debug, Clone)]
pub struct PostListQuery {
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict to one author.
    pub author_id: Option<UserId>,
    /// Which posts the viewer may see.
    pub visibility: PostVisibility,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn new(visibility: PostVisibility) -> Self {
        Self {
            category_id: None,
            author_id: None,
            visibility,
            pagination: None,
        }
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
    /// Fetch an account with its password hash for authentication.
    fn get_credentials(&self, username: &Username) -> RepositoryResult<Option<UserCredentials>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new account and return it.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Update profile fields of an account.
    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepositoryResult<usize>;
    /// Replace the stored password hash.
    fn set_password_hash(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize>;
}

/// Read-only operations for categories.
pub trait CategoryReader {
    /// All categories ordered by title.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>>;
}

/// Write operations for categories.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    fn set_category_published(&self, id: CategoryId, is_published: bool)
    -> RepositoryResult<usize>;
}

/// Read-only operations for locations.
pub trait LocationReader {
    /// All locations ordered by name.
    fn list_locations(&self) -> RepositoryResult<Vec<Location>>;
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>>;
}

/// Write operations for locations.
pub trait LocationWriter {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location>;
}

/// Read-only operations for posts.
pub trait PostReader {
    /// List posts matching the query, newest publication first.
    /// Returns the total number of matches alongside the requested page.
    fn list_posts(&self, query: PostListQuery)
    -> RepositoryResult<(usize, Vec<PostWithRelations>)>;
    /// Retrieve a post by its identifier regardless of visibility.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<PostWithRelations>>;
}

/// Write operations for posts.
pub trait PostWriter {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId>;
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize>;
    /// Delete a post together with its comments.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for comments.
pub trait CommentReader {
    /// Comments of a post, oldest first.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<CommentWithAuthor>>;
    /// Look a comment up within the scope of its parent post.
    fn get_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comments. Every mutation is scoped to the parent post.
pub trait CommentWriter {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId>;
    fn update_comment(
        &self,
        post_id: PostId,
        id: CommentId,
        text: &CommentText,
    ) -> RepositoryResult<usize>;
    fn delete_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<usize>;
}
