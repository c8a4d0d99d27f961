use std::sync::Mutex;

use chrono::{NaiveDateTime, Utc};

use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{ImageChange, NewPost, Post, PostUpdate, PostWithRelations};
use crate::domain::types::{
    CategoryDescription, CategoryId, CategorySlug, CategoryTitle, CommentId, CommentText, Email,
    LocationId, LocationName, PostId, PostText, PostTitle, UserId, Username,
};
use crate::domain::user::{NewUser, User, UserCredentials, UserUpdate};
use crate::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, LocationReader, LocationWriter,
    PostListQuery, PostReader, PostWriter, RepositoryError, RepositoryResult, UserReader,
    UserWriter,
};

#[derive(Default)]
struct State {
    next_id: i32,
    users: Vec<(User, String)>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone())
    }

    fn with_relations(&self, post: &Post) -> Option<PostWithRelations> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == post.category_id)?
            .clone();
        let location = post
            .location_id
            .and_then(|id| self.locations.iter().find(|l| l.id == id).cloned());
        let author = self.user(post.author_id)?;
        let comment_count = self
            .comments
            .iter()
            .filter(|c| c.post_id == post.id)
            .count() as i64;
        Some(PostWithRelations {
            post: post.clone(),
            category,
            location,
            author,
            comment_count,
        })
    }
}

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, username: &str) -> User {
        self.add_user_with_hash(username, "")
    }

    pub fn add_user_with_hash(&self, username: &str, password_hash: &str) -> User {
        let mut state = self.state();
        let user = User {
            id: UserId::new(state.next_id()).unwrap(),
            username: Username::new(username).unwrap(),
            email: Email::default(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            date_joined: Utc::now().naive_utc(),
        };
        state.users.push((user.clone(), password_hash.to_string()));
        user
    }

    pub fn add_category(&self, slug: &str, is_published: bool) -> Category {
        let mut state = self.state();
        let category = Category {
            id: CategoryId::new(state.next_id()).unwrap(),
            title: CategoryTitle::new(slug).unwrap(),
            description: CategoryDescription::new(format!("About {slug}")).unwrap(),
            slug: CategorySlug::new(slug).unwrap(),
            is_published,
            created_at: Utc::now().naive_utc(),
        };
        state.categories.push(category.clone());
        category
    }

    pub fn add_location(&self, name: &str) -> Location {
        let mut state = self.state();
        let location = Location {
            id: LocationId::new(state.next_id()).unwrap(),
            name: LocationName::new(name).unwrap(),
            is_published: true,
            created_at: Utc::now().naive_utc(),
        };
        state.locations.push(location.clone());
        location
    }

    pub fn add_post(
        &self,
        title: &str,
        author: &User,
        category: &Category,
        pub_date: NaiveDateTime,
        is_published: bool,
    ) -> Post {
        let mut state = self.state();
        let post = Post {
            id: PostId::new(state.next_id()).unwrap(),
            title: PostTitle::new(title).unwrap(),
            text: PostText::new(format!("{title} text")).unwrap(),
            pub_date,
            image: None,
            is_published,
            created_at: Utc::now().naive_utc(),
            author_id: author.id,
            category_id: category.id,
            location_id: None,
        };
        state.posts.push(post.clone());
        post
    }

    pub fn add_comment(&self, text: &str, post: &Post, author: &User) -> Comment {
        let mut state = self.state();
        let comment = Comment {
            id: CommentId::new(state.next_id()).unwrap(),
            text: CommentText::new(text).unwrap(),
            is_published: true,
            created_at: Utc::now().naive_utc(),
            post_id: post.id,
            author_id: author.id,
        };
        state.comments.push(comment.clone());
        comment
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.state().posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn comment(&self, id: CommentId) -> Option<Comment> {
        self.state().comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn set_pub_date(&self, id: PostId, pub_date: NaiveDateTime) {
        if let Some(post) = self.state().posts.iter_mut().find(|p| p.id == id) {
            post.pub_date = pub_date;
        }
    }

    pub fn password_hash(&self, id: UserId) -> Option<String> {
        self.state()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, hash)| hash.clone())
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.state().user(id))
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(u, _)| &u.username == username)
            .map(|(u, _)| u.clone()))
    }

    fn get_credentials(&self, username: &Username) -> RepositoryResult<Option<UserCredentials>> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(u, _)| &u.username == username)
            .map(|(u, hash)| UserCredentials {
                user: u.clone(),
                password_hash: hash.clone(),
            }))
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut state = self.state();
        if state.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: users.username".to_string(),
            ));
        }
        let created = User {
            id: UserId::new(state.next_id()).unwrap(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            date_joined: Utc::now().naive_utc(),
        };
        state
            .users
            .push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepositoryResult<usize> {
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|(u, _)| u.username == update.username && u.id != id)
        {
            return Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: users.username".to_string(),
            ));
        }
        let Some((user, _)) = state.users.iter_mut().find(|(u, _)| u.id == id) else {
            return Ok(0);
        };
        user.username = update.username.clone();
        user.email = update.email.clone();
        user.first_name = update.first_name.clone();
        user.last_name = update.last_name.clone();
        Ok(1)
    }

    fn set_password_hash(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize> {
        let mut state = self.state();
        match state.users.iter_mut().find(|(u, _)| u.id == id) {
            Some((_, hash)) => {
                *hash = password_hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.state().categories.clone())
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self
            .state()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        Ok(self
            .state()
            .categories
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state();
        let created = Category {
            id: CategoryId::new(state.next_id()).unwrap(),
            title: category.title.clone(),
            description: category.description.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
            created_at: Utc::now().naive_utc(),
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn set_category_published(
        &self,
        id: CategoryId,
        is_published: bool,
    ) -> RepositoryResult<usize> {
        let mut state = self.state();
        match state.categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                category.is_published = is_published;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl LocationReader for TestRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        Ok(self.state().locations.clone())
    }

    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        Ok(self
            .state()
            .locations
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }
}

impl LocationWriter for TestRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        let mut state = self.state();
        let created = Location {
            id: LocationId::new(state.next_id()).unwrap(),
            name: location.name.clone(),
            is_published: location.is_published,
            created_at: Utc::now().naive_utc(),
        };
        state.locations.push(created.clone());
        Ok(created)
    }
}

impl PostReader for TestRepository {
    fn list_posts(
        &self,
        query: PostListQuery,
    ) -> RepositoryResult<(usize, Vec<PostWithRelations>)> {
        let state = self.state();
        let mut items: Vec<PostWithRelations> = state
            .posts
            .iter()
            .filter_map(|p| state.with_relations(p))
            .filter(|p| query.category_id.is_none_or(|id| p.post.category_id == id))
            .filter(|p| query.author_id.is_none_or(|id| p.post.author_id == id))
            .filter(|p| query.visibility.admits(&p.post, &p.category))
            .collect();
        items.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then(b.post.id.cmp(&a.post.id))
        });
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip((pagination.page.max(1) - 1) * pagination.per_page)
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<PostWithRelations>> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| state.with_relations(p)))
    }
}

impl PostWriter for TestRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId> {
        let mut state = self.state();
        let id = PostId::new(state.next_id()).unwrap();
        state.posts.push(Post {
            id,
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            image: post.image.clone(),
            is_published: post.is_published,
            created_at: Utc::now().naive_utc(),
            author_id: post.author_id,
            category_id: post.category_id,
            location_id: post.location_id,
        });
        Ok(id)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        let mut state = self.state();
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        post.title = update.title.clone();
        post.text = update.text.clone();
        post.pub_date = update.pub_date;
        post.category_id = update.category_id;
        post.location_id = update.location_id;
        match &update.image {
            ImageChange::Keep => {}
            ImageChange::Replace(image) => post.image = Some(image.clone()),
            ImageChange::Clear => post.image = None,
        }
        Ok(1)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        let mut state = self.state();
        state.comments.retain(|c| c.post_id != id);
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        Ok(before - state.posts.len())
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<CommentWithAuthor>> {
        let state = self.state();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                state.user(c.author_id).map(|author| CommentWithAuthor {
                    comment: c.clone(),
                    author,
                })
            })
            .collect())
    }

    fn get_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<Option<Comment>> {
        Ok(self
            .state()
            .comments
            .iter()
            .find(|c| c.post_id == post_id && c.id == id)
            .cloned())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId> {
        let mut state = self.state();
        let id = CommentId::new(state.next_id()).unwrap();
        state.comments.push(Comment {
            id,
            text: comment.text.clone(),
            is_published: true,
            created_at: Utc::now().naive_utc(),
            post_id: comment.post_id,
            author_id: comment.author_id,
        });
        Ok(id)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        id: CommentId,
        text: &CommentText,
    ) -> RepositoryResult<usize> {
        let mut state = self.state();
        match state
            .comments
            .iter_mut()
            .find(|c| c.post_id == post_id && c.id == id)
        {
            Some(comment) => {
                comment.text = text.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<usize> {
        let mut state = self.state();
        let before = state.comments.len();
        state
            .comments
            .retain(|c| !(c.post_id == post_id && c.id == id));
        Ok(before - state.comments.len())
    }
}
