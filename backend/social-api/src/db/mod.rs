/// Storage layer: capability traits, Postgres repositories, pool
/// construction and error classification.
///
/// Every statement runs under a fixed deadline; repositories borrow a
/// connection from the pool per call and never retain one.
pub mod comment_store;
pub mod post_store;
pub mod role_store;
pub mod user_store;

pub use comment_store::PgCommentStore;
pub use post_store::PgPostStore;
pub use role_store::PgRoleStore;
pub use user_store::PgUserStore;

use async_trait::async_trait;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::{Comment, FeedQuery, NewPost, NewUser, Post, PostWithMetadata, Role, User};

/// Hard per-statement deadline; expiry is an internal fault, never a retry.
pub const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(QUERY_TIMEOUT)
        .connect(&config.url)
        .await
}

/// Run a storage future under the fixed deadline and classify its error.
pub(crate) async fn with_deadline<T, F>(fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(res) => res.map_err(classify),
        Err(_) => Err(AppError::Database("statement deadline exceeded".to_string())),
    }
}

/// Classify a sqlx error into the error taxonomy once, at the storage
/// boundary, using structured constraint metadata rather than driver
/// message text.
pub(crate) fn classify(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
            Some("users_username_key") => AppError::DuplicateUsername,
            Some("users_email_key") => AppError::DuplicateEmail,
            _ => AppError::Conflict,
        },
        _ => AppError::Database(err.to_string()),
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the inactive user row and its invitation row in one atomic
    /// transaction; `token_hash` is the one-way hash of the plaintext
    /// activation token, valid for `ttl`.
    async fn create_and_invite(&self, user: NewUser, token_hash: &str, ttl: Duration)
        -> Result<User>;

    /// Activate the user bound to an unexpired invitation matching
    /// `token_hash`, deleting all of that user's invitations in the same
    /// transaction. Absent and expired tokens are both `NotFound`.
    async fn activate(&self, token_hash: &str) -> Result<()>;

    async fn get_by_id(&self, user_id: Uuid) -> Result<User>;

    async fn get_by_email(&self, email: &str) -> Result<User>;

    /// Delete the user and any pending invitations in one transaction.
    async fn delete(&self, user_id: Uuid) -> Result<()>;

    /// Record that `follower_id` follows `followed_id`; a duplicate edge
    /// is a `Conflict`.
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()>;

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post>;

    async fn get_by_id(&self, post_id: Uuid) -> Result<Post>;

    /// Conditional write keyed on `(id, version)`; the stored version
    /// advances by exactly 1. A stale version and a missing row are both
    /// `NotFound`.
    async fn update(&self, post: &Post) -> Result<Post>;

    async fn delete(&self, post_id: Uuid) -> Result<()>;

    async fn get_user_feed(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<PostWithMetadata>>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get_by_name(&self, name: &str) -> Result<Role>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn get_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>>;
}

/// Aggregate of the storage capabilities, swappable for test doubles.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub roles: Arc<dyn RoleStore>,
    pub comments: Arc<dyn CommentStore>,
}

impl Storage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool.clone())),
            roles: Arc::new(PgRoleStore::new(pool.clone())),
            comments: Arc::new(PgCommentStore::new(pool)),
        }
    }
}
