use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{ensure_allowed, list_page, require_admin};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        Album, ApiMessage, Availability, EmailQuery, NewUser, Post, User, UserProfile,
        UserSummary, UserUpdate, UsernameQuery,
    },
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity, Role},
    repository::{
        AlbumScope, PostScope,
        relations::{self, AccountStores},
    },
};

async fn fetch_user(state: &AppState, username: &str) -> AppResult<User> {
    state.users.find_by_username(username).await?.ok_or_else(|| {
        tracing::debug!(username, "user not found");
        AppError::NotFound(format!("User not found with username {username}"))
    })
}

/// get_me
///
/// [Authenticated Route] Returns the caller's own account.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSummary),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> AppResult<Json<UserSummary>> {
    let user = state
        .users
        .find_by_id(identity.id())
        .await?
        .ok_or_else(|| AppError::not_found("User", identity.id()))?;
    Ok(Json(UserSummary::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/check-username",
    params(UsernameQuery),
    responses((status = 200, description = "Whether the username is free", body = Availability))
)]
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> AppResult<Json<Availability>> {
    let taken = state.users.username_exists(&query.username).await?;
    Ok(Json(Availability { available: !taken }))
}

#[utoipa::path(
    get,
    path = "/api/users/check-email",
    params(EmailQuery),
    responses((status = 200, description = "Whether the email is free", body = Availability))
)]
pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<Availability>> {
    let taken = state.users.email_exists(&query.email).await?;
    Ok(Json(Availability { available: !taken }))
}

/// get_profile
///
/// [Public Route] Public profile of a user, with the number of posts they wrote.
#[utoipa::path(
    get,
    path = "/api/users/{username}/profile",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let user = fetch_user(&state, &username).await?;
    let post_count = state.posts.count(PostScope::Author(user.id)).await?;
    Ok(Json(UserProfile {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        joined_at: user.created_at,
        post_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/posts",
    params(("username" = String, Path, description = "Username"), PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = PagedEnvelope<Post>),
        (status = 404, description = "User Not Found")
    )
)]
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Post>>> {
    let user = fetch_user(&state, &username).await?;
    let page = list_page(
        state.posts.as_ref(),
        PostScope::Author(user.id),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/albums",
    params(("username" = String, Path, description = "Username"), PageQuery),
    responses(
        (status = 200, description = "Page of albums", body = PagedEnvelope<Album>),
        (status = 404, description = "User Not Found")
    )
)]
pub async fn get_user_albums(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Album>>> {
    let user = fetch_user(&state, &username).await?;
    let page = list_page(
        state.albums.as_ref(),
        AlbumScope::Owner(user.id),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

/// update_user
///
/// [Authenticated Route] Edits a profile. The account holder or an admin may do so;
/// an email already used by another account is a conflict.
#[utoipa::path(
    put,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 403, description = "Not Account Holder"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Email Taken")
    )
)]
pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let user = fetch_user(&state, &username).await?;
    ensure_allowed(&identity, &user, Capability::Edit, "User")?;

    if let Some(email) = payload.email.as_deref() {
        if email != user.email && state.users.email_exists(email).await? {
            return Err(AppError::Conflict("Email is already taken".to_string()));
        }
    }

    let updated = state
        .users
        .update(user.id, payload)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    tracing::info!(target_user = user.id, user_id = identity.id(), "user updated");
    Ok(Json(updated))
}

/// delete_user
///
/// [Authenticated Route] Removes an account with everything it owns. Refused while
/// one of its categories or tags is used by another user's post.
#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Account Holder"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Category or Tag Still In Use")
    )
)]
pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiMessage>> {
    let user = fetch_user(&state, &username).await?;
    ensure_allowed(&identity, &user, Capability::Delete, "User")?;
    let stores = AccountStores {
        users: state.users.as_ref(),
        posts: state.posts.as_ref(),
        comments: state.comments.as_ref(),
        categories: state.categories.as_ref(),
        tags: state.tags.as_ref(),
        albums: state.albums.as_ref(),
        photos: state.photos.as_ref(),
        todos: state.todos.as_ref(),
    };
    if !relations::delete_account(&stores, user.id).await? {
        return Err(AppError::not_found("User", user.id));
    }
    tracing::info!(target_user = user.id, user_id = identity.id(), "user deleted");
    Ok(Json(ApiMessage::ok(format!(
        "You successfully deleted profile of: {username}"
    ))))
}

// --- Admin ---

/// create_user
///
/// [Admin Route] Mirrors an account created with the identity provider. Usernames
/// and emails are unique.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 403, description = "Forbidden (Admin only)"),
        (status = 409, description = "Username or Email Taken")
    )
)]
pub async fn create_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_admin(&identity)?;
    if state.users.username_exists(&payload.username).await? {
        return Err(AppError::Conflict("Username is already taken".to_string()));
    }
    if state.users.email_exists(&payload.email).await? {
        return Err(AppError::Conflict("Email is already taken".to_string()));
    }
    let user = state.users.insert(payload).await?;
    tracing::info!(new_user = user.id, user_id = identity.id(), "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn set_roles(
    state: &AppState,
    identity: &Identity,
    username: &str,
    roles: Vec<Role>,
) -> AppResult<User> {
    let user = fetch_user(state, username).await?;
    require_admin(identity)?;
    let updated = state
        .users
        .set_roles(user.id, roles)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    tracing::info!(
        target_user = user.id,
        roles = ?updated.roles,
        user_id = identity.id(),
        "roles changed"
    );
    Ok(updated)
}

#[utoipa::path(
    put,
    path = "/api/users/{username}/give-admin",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Promoted", body = ApiMessage),
        (status = 403, description = "Forbidden (Admin only)"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn give_admin(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiMessage>> {
    set_roles(&state, &identity, &username, vec![Role::User, Role::Admin]).await?;
    Ok(Json(ApiMessage::ok(format!(
        "You gave ADMIN role to user: {username}"
    ))))
}

#[utoipa::path(
    put,
    path = "/api/users/{username}/take-admin",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Demoted", body = ApiMessage),
        (status = 403, description = "Forbidden (Admin only)"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn take_admin(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiMessage>> {
    set_roles(&state, &identity, &username, vec![Role::User]).await?;
    Ok(Json(ApiMessage::ok(format!(
        "You took ADMIN role from user: {username}"
    ))))
}
