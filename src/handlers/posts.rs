use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{
    confirm_deleted, deleted_message, fetch, fetch_authorized, list_page, write_update,
};
use crate::{
    AppState,
    error::AppResult,
    models::{ApiMessage, Post, PostRequest},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::{PostScope, relations},
};

/// Every post must point at an existing category and existing tags.
async fn check_references(state: &AppState, request: &PostRequest) -> AppResult<()> {
    fetch(state.categories.as_ref(), request.category_id).await?;
    for tag_id in &request.tags {
        fetch(state.tags.as_ref(), *tag_id).await?;
    }
    Ok(())
}

/// get_posts
///
/// [Public Route] Lists all posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = PagedEnvelope<Post>),
        (status = 400, description = "Invalid page or size")
    )
)]
pub async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Post>>> {
    let page = list_page(
        state.posts.as_ref(),
        PostScope::All,
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Post>> {
    Ok(Json(fetch(state.posts.as_ref(), id).await?))
}

/// get_posts_by_category
///
/// [Public Route] Lists the posts filed under a category. The category must exist.
#[utoipa::path(
    get,
    path = "/api/posts/category/{id}",
    params(("id" = i64, Path, description = "Category ID"), PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = PagedEnvelope<Post>),
        (status = 404, description = "Category Not Found")
    )
)]
pub async fn get_posts_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Post>>> {
    fetch(state.categories.as_ref(), id).await?;
    let page = list_page(
        state.posts.as_ref(),
        PostScope::Category(id),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

/// get_posts_by_tag
///
/// [Public Route] Lists the posts carrying a tag. The tag must exist.
#[utoipa::path(
    get,
    path = "/api/posts/tag/{id}",
    params(("id" = i64, Path, description = "Tag ID"), PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = PagedEnvelope<Post>),
        (status = 404, description = "Tag Not Found")
    )
)]
pub async fn get_posts_by_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Post>>> {
    fetch(state.tags.as_ref(), id).await?;
    let page = list_page(
        state.posts.as_ref(),
        PostScope::Tag(id),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

/// create_post
///
/// [Authenticated Route] Publishes a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 404, description = "Category or Tag Not Found")
    )
)]
pub async fn create_post(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<PostRequest>,
) -> AppResult<(StatusCode, Json<Post>)> {
    check_references(&state, &payload).await?;
    let post = state.posts.insert(identity.id(), payload).await?;
    tracing::info!(post_id = post.id, user_id = identity.id(), "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_post
///
/// [Authenticated Route] Replaces a post. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PostRequest>,
) -> AppResult<Json<Post>> {
    fetch_authorized(state.posts.as_ref(), &identity, id, Capability::Edit).await?;
    check_references(&state, &payload).await?;
    let post = write_update(state.posts.as_ref(), &identity, id, payload).await?;
    Ok(Json(post))
}

/// delete_post
///
/// [Authenticated Route] Deletes a post and its comments. Owner or admin only; a
/// denied request leaves both untouched.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    fetch_authorized(state.posts.as_ref(), &identity, id, Capability::Delete).await?;
    let removed =
        relations::delete_post(state.posts.as_ref(), state.comments.as_ref(), id).await?;
    confirm_deleted::<Post>(removed, &identity, id)?;
    Ok(Json(deleted_message("Post")))
}
