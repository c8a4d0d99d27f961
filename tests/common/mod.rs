//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDateTime, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_blog::domain::category::{Category, NewCategory};
use pushkind_blog::domain::location::{Location, NewLocation};
use pushkind_blog::domain::post::NewPost;
use pushkind_blog::domain::types::{
    CategoryDescription, CategorySlug, CategoryTitle, Email, LocationName, PostId, PostText,
    PostTitle, Username,
};
use pushkind_blog::domain::user::{NewUser, User};
use pushkind_blog::repository::{
    CategoryWriter, DieselRepository, LocationWriter, PostWriter, UserWriter,
};
use pushkind_blog::services::accounts::hash_password;
use pushkind_common::db::{DbPool, establish_connection_pool};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn hours_ago(hours: i64) -> NaiveDateTime {
    now() - Duration::hours(hours)
}

pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser {
        username: Username::new(username).unwrap(),
        email: Email::default(),
        password_hash: "not-a-real-hash".to_string(),
    })
    .expect("should create user")
}

/// User able to sign in with `password`.
pub fn create_user_with_password(repo: &DieselRepository, username: &str, password: &str) -> User {
    repo.create_user(&NewUser {
        username: Username::new(username).unwrap(),
        email: Email::default(),
        password_hash: hash_password(password).expect("should hash password"),
    })
    .expect("should create user")
}

pub fn create_category(repo: &DieselRepository, slug: &str, is_published: bool) -> Category {
    repo.create_category(&NewCategory {
        title: CategoryTitle::new(slug).unwrap(),
        description: CategoryDescription::new(format!("About {slug}")).unwrap(),
        slug: CategorySlug::new(slug).unwrap(),
        is_published,
    })
    .expect("should create category")
}

pub fn create_location(repo: &DieselRepository, name: &str) -> Location {
    repo.create_location(&NewLocation {
        name: LocationName::new(name).unwrap(),
        is_published: true,
    })
    .expect("should create location")
}

pub fn create_post(
    repo: &DieselRepository,
    title: &str,
    author: &User,
    category: &Category,
    pub_date: NaiveDateTime,
    is_published: bool,
) -> PostId {
    repo.create_post(&NewPost {
        title: PostTitle::new(title).unwrap(),
        text: PostText::new(format!("{title} body")).unwrap(),
        pub_date,
        image: None,
        is_published,
        author_id: author.id,
        category_id: category.id,
        location_id: None,
    })
    .expect("should create post")
}
