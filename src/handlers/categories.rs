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
    models::{ApiMessage, NameRequest, Category},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::{NamedScope, relations},
};

/// get_categories
///
/// [Public Route] Lists every category, newest first.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of categories", body = PagedEnvelope<Category>),
        (status = 400, description = "Invalid page or size")
    )
)]
pub async fn get_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Category>>> {
    let page = list_page(
        state.categories.as_ref(),
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
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Found", body = Category),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    Ok(Json(fetch(state.categories.as_ref(), id).await?))
}

/// create_category
///
/// [Authenticated Route] Any signed-in user may open a category; it is owned by its creator.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NameRequest,
    responses((status = 201, description = "Created", body = Category))
)]
pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.categories.insert(identity.id(), payload).await?;
    tracing::info!(category_id = category.id, user_id = identity.id(), "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NameRequest>,
) -> AppResult<Json<Category>> {
    Ok(Json(update_guarded(state.categories.as_ref(), &identity, id, payload).await?))
}

/// delete_category
///
/// [Authenticated Route] Owner or admin. Refused while any post is filed under it.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Still Used By Posts")
    )
)]
pub async fn delete_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    fetch_authorized(state.categories.as_ref(), &identity, id, Capability::Delete).await?;
    let removed =
        relations::delete_category(state.categories.as_ref(), state.posts.as_ref(), id).await?;
    confirm_deleted::<Category>(removed, &identity, id)?;
    Ok(Json(deleted_message("Category")))
}
