use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{deleted_message, ensure_allowed, fetch, list_page, write_update};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ApiMessage, Comment, CommentDraft, CommentRequest},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::CommentScope,
};

/// Loads a comment through its parent post: post first, then comment, then the
/// parent link. A comment reached through the wrong post is a bad request.
async fn fetch_in_post(state: &AppState, post_id: i64, id: i64) -> AppResult<Comment> {
    fetch(state.posts.as_ref(), post_id).await?;
    let comment = fetch(state.comments.as_ref(), id).await?;
    if comment.post_id != post_id {
        tracing::debug!(post_id, comment_id = id, "comment requested through another post");
        return Err(AppError::BadRequest(
            "Comment does not belong to post".to_string(),
        ));
    }
    Ok(comment)
}

/// get_comments
///
/// [Public Route] Lists the comments of a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post ID"), PageQuery),
    responses(
        (status = 200, description = "Page of comments", body = PagedEnvelope<Comment>),
        (status = 404, description = "Post Not Found")
    )
)]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Comment>>> {
    fetch(state.posts.as_ref(), post_id).await?;
    let page = list_page(
        state.comments.as_ref(),
        CommentScope::Post(post_id),
        query,
        Sort::OLDEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments/{comment_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Found", body = Comment),
        (status = 400, description = "Comment Belongs To Another Post"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(fetch_in_post(&state, post_id, id).await?))
}

/// add_comment
///
/// [Authenticated Route] Comments on an existing post as the caller.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Created", body = Comment),
        (status = 404, description = "Post Not Found")
    )
)]
pub async fn add_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    fetch(state.posts.as_ref(), post_id).await?;
    let draft = CommentDraft {
        post_id,
        body: payload.body,
    };
    let comment = state.comments.insert(identity.id(), draft).await?;
    tracing::info!(comment_id = comment.id, post_id, user_id = identity.id(), "comment added");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// update_comment
///
/// [Authenticated Route] Rewrites a comment body. Author or admin only.
#[utoipa::path(
    put,
    path = "/api/posts/{id}/comments/{comment_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated", body = Comment),
        (status = 400, description = "Comment Belongs To Another Post"),
        (status = 403, description = "Not Author"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = fetch_in_post(&state, post_id, id).await?;
    ensure_allowed(&identity, &comment, Capability::Edit, "Comment")?;
    let draft = CommentDraft {
        post_id,
        body: payload.body,
    };
    let comment = write_update(state.comments.as_ref(), &identity, id, draft).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/comments/{comment_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 400, description = "Comment Belongs To Another Post"),
        (status = 403, description = "Not Author"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiMessage>> {
    let comment = fetch_in_post(&state, post_id, id).await?;
    ensure_allowed(&identity, &comment, Capability::Delete, "Comment")?;
    if !state.comments.delete_by_id(id).await? {
        return Err(AppError::not_found("Comment", id));
    }
    tracing::info!(comment_id = id, post_id, user_id = identity.id(), "comment deleted");
    Ok(Json(deleted_message("Comment")))
}
