use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{
    confirm_deleted, deleted_message, fetch, fetch_authorized, list_page, update_guarded,
};
use crate::{
    AppState,
    error::AppResult,
    models::{ApiMessage, NameRequest, Tag},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::{NamedScope, relations},
};

#[utoipa::path(
    get,
    path = "/api/tags",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of tags", body = PagedEnvelope<Tag>),
        (status = 400, description = "Invalid page or size")
    )
)]
pub async fn get_tags(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Tag>>> {
    let page = list_page(
        state.tags.as_ref(),
        NamedScope::All,
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Found", body = Tag),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_tag(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Tag>> {
    Ok(Json(fetch(state.tags.as_ref(), id).await?))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = NameRequest,
    responses((status = 201, description = "Created", body = Tag))
)]
pub async fn create_tag(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.tags.insert(identity.id(), payload).await?;
    tracing::info!(tag_id = tag.id, user_id = identity.id(), "tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Updated", body = Tag),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NameRequest>,
) -> AppResult<Json<Tag>> {
    Ok(Json(update_guarded(state.tags.as_ref(), &identity, id, payload).await?))
}

/// A tag still carried by a post cannot be removed.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Still Used By Posts")
    )
)]
pub async fn delete_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    fetch_authorized(state.tags.as_ref(), &identity, id, Capability::Delete).await?;
    let removed = relations::delete_tag(state.tags.as_ref(), state.posts.as_ref(), id).await?;
    confirm_deleted::<Tag>(removed, &identity, id)?;
    Ok(Json(deleted_message("Tag")))
}
