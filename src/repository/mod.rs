use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    models::{
        Album, AlbumRequest, Category, Comment, CommentDraft, NameRequest, NewUser, Photo,
        PhotoRequest, Post, PostRequest, Tag, Todo, TodoRequest, User, UserUpdate,
    },
    pagination::PageRequest,
    policy::{OwnedResource, Role},
};

pub mod memory;
pub mod postgres;
pub mod relations;

pub use memory::{MemoryStore, MemoryUserStore};
pub use postgres::PostgresRepository;

/// StoreError
///
/// Failures raised by a persistence adapter. `Referenced` is the only one a caller
/// can act on (it surfaces as a conflict); the rest become internal errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("stored row is invalid: {0}")]
    Corrupt(String),
    #[error("{0}")]
    Referenced(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // A delete that lost a race with an insert trips the RESTRICT foreign keys.
        if let Some(db) = err.as_database_error() {
            if db.is_foreign_key_violation() {
                let constraint = db.constraint().unwrap_or("foreign key").to_string();
                return Self::Referenced(format!("Row is still referenced ({constraint})"));
            }
        }
        Self::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Resource
///
/// Ties a record type to the payload that creates or replaces it (`Draft`) and to
/// the criteria its listings can be narrowed by (`Scope`).
pub trait Resource: OwnedResource + Clone + Send + Sync + 'static {
    /// Human-readable name used in error messages.
    const NAME: &'static str;
    type Draft: Send + Sync + 'static;
    type Scope: Clone + Send + Sync + 'static;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Author(i64),
    Category(i64),
    Tag(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentScope {
    Post(i64),
    Author(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumScope {
    All,
    Owner(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoScope {
    All,
    Album(i64),
    Owner(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoScope {
    Owner(i64),
}

/// Categories and tags are listed in full; the owner filter is used when an
/// account is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedScope {
    All,
    Owner(i64),
}

impl Resource for Post {
    const NAME: &'static str = "Post";
    type Draft = PostRequest;
    type Scope = PostScope;
}

impl Resource for Comment {
    const NAME: &'static str = "Comment";
    type Draft = CommentDraft;
    type Scope = CommentScope;
}

impl Resource for Category {
    const NAME: &'static str = "Category";
    type Draft = NameRequest;
    type Scope = NamedScope;
}

impl Resource for Tag {
    const NAME: &'static str = "Tag";
    type Draft = NameRequest;
    type Scope = NamedScope;
}

impl Resource for Album {
    const NAME: &'static str = "Album";
    type Draft = AlbumRequest;
    type Scope = AlbumScope;
}

impl Resource for Photo {
    const NAME: &'static str = "Photo";
    type Draft = PhotoRequest;
    type Scope = PhotoScope;
}

impl Resource for Todo {
    const NAME: &'static str = "Todo";
    type Draft = TodoRequest;
    type Scope = TodoScope;
}

/// ResourceStore
///
/// The persistence collaborator for one resource type. Implementations decide how
/// rows are stored; the contract only fixes what comes back.
///
/// - `insert` records `owner_id` as the owner; `update` never changes it.
/// - `find_page` returns at most `page.size` rows starting at `page.offset()`,
///   ordered by `page.sort`, together with the total number of rows in `scope`.
/// - Deletes never cascade into other resources. Rows that depend on the deleted
///   one are handled by [`relations`]; Postgres rejects a delete that would orphan them.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<R>>;
    async fn insert(&self, owner_id: i64, draft: R::Draft) -> StoreResult<R>;
    async fn update(&self, id: i64, draft: R::Draft) -> StoreResult<Option<R>>;
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
    /// Deletes every row in `scope` and returns how many went.
    async fn delete_where(&self, scope: R::Scope) -> StoreResult<u64>;
    async fn count(&self, scope: R::Scope) -> StoreResult<i64>;
    async fn find_page(&self, scope: R::Scope, page: &PageRequest) -> StoreResult<(Vec<R>, i64)>;
}

/// UserStore
///
/// Account look-ups used both by the identity resolver and by the user endpoints.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn username_exists(&self, username: &str) -> StoreResult<bool>;
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
    // Partial update: `None` fields keep their current value.
    async fn update(&self, id: i64, update: UserUpdate) -> StoreResult<Option<User>>;
    async fn set_roles(&self, id: i64, roles: Vec<Role>) -> StoreResult<Option<User>>;
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
}

/// Shared handle to a resource store, as held in `AppState`.
pub type StoreState<R> = Arc<dyn ResourceStore<R>>;

pub type UserStoreState = Arc<dyn UserStore>;
