use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::policy::{OwnedResource, Role};

// --- Resource Records (Mapped to Database) ---

/// User
///
/// A blog account as stored in `users`. Credentials live with the external identity
/// provider; this record only mirrors the profile and the role set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// A user owns its own account, so profile edits go through the same policy as posts.
impl OwnedResource for User {
    fn id(&self) -> i64 {
        self.id
    }
    fn owner_id(&self) -> i64 {
        self.id
    }
}

/// Post
///
/// A blog post. `tags` holds the ids of the attached tags, ordered ascending.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Post {
    pub id: i64,
    // FK to users.id (Owner).
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub body: String,
    pub tags: Vec<i64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub body: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Tag {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Album {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Photo
///
/// A photo inside an album. `user_id` is the album owner at the time of upload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub album_id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

macro_rules! owned_by_user_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OwnedResource for $ty {
                fn id(&self) -> i64 {
                    self.id
                }
                fn owner_id(&self) -> i64 {
                    self.user_id
                }
            }
        )+
    };
}

owned_by_user_id!(Post, Comment, Category, Tag, Album, Photo, Todo);

// --- Request Payloads (Input Schemas) ---

/// PostRequest
///
/// Create/replace payload for a post. The category and every tag id must already exist.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
    pub category_id: i64,
    #[serde(default)]
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CommentRequest {
    pub body: String,
}

/// CommentDraft
///
/// What the store needs to persist a comment: the request body plus the parent post
/// taken from the path. `update` only ever rewrites `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
    pub post_id: i64,
    pub body: String,
}

/// Shared by categories and tags, which only carry a name.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AlbumRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PhotoRequest {
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    pub album_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// NewUser
///
/// Admin payload for mirroring an account created with the identity provider.
/// New accounts always start with the `USER` role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// UserUpdate
///
/// Partial profile update. Only provided fields change; username and roles are not editable here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    pub email: String,
}

// --- Response Payloads (Output Schemas) ---

/// ApiMessage
///
/// Body returned by delete and role-change endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Availability {
    pub available: bool,
}

/// UserSummary
///
/// The authenticated caller as seen by `GET /api/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: user.roles,
        }
    }
}

/// UserProfile
///
/// Public profile with the number of posts the user has written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[ts(type = "string")]
    pub joined_at: DateTime<Utc>,
    pub post_count: i64,
}
