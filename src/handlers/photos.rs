use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{
    delete_guarded, deleted_message, ensure_allowed, fetch, fetch_authorized, list_page,
    write_update,
};
use crate::{
    AppState,
    error::AppResult,
    models::{Album, ApiMessage, Photo, PhotoRequest},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::PhotoScope,
};

/// A photo may only be placed in an album the caller may edit.
async fn target_album(state: &AppState, identity: &Identity, album_id: i64) -> AppResult<Album> {
    let album = fetch(state.albums.as_ref(), album_id).await?;
    ensure_allowed(identity, &album, Capability::Edit, "Album")?;
    Ok(album)
}

#[utoipa::path(
    get,
    path = "/api/photos",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of photos", body = PagedEnvelope<Photo>),
        (status = 400, description = "Invalid page or size")
    )
)]
pub async fn get_photos(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Photo>>> {
    let page = list_page(
        state.photos.as_ref(),
        PhotoScope::All,
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Found", body = Photo),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Photo>> {
    Ok(Json(fetch(state.photos.as_ref(), id).await?))
}

/// add_photo
///
/// [Authenticated Route] Adds a photo to an album the caller may edit. The photo is
/// owned by the album's owner, so an admin uploading into someone's album does not
/// take it over.
#[utoipa::path(
    post,
    path = "/api/photos",
    request_body = PhotoRequest,
    responses(
        (status = 201, description = "Created", body = Photo),
        (status = 403, description = "Not Album Owner"),
        (status = 404, description = "Album Not Found")
    )
)]
pub async fn add_photo(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<PhotoRequest>,
) -> AppResult<(StatusCode, Json<Photo>)> {
    let album = target_album(&state, &identity, payload.album_id).await?;
    let photo = state.photos.insert(album.user_id, payload).await?;
    tracing::info!(
        photo_id = photo.id,
        album_id = album.id,
        user_id = identity.id(),
        "photo added"
    );
    Ok((StatusCode::CREATED, Json(photo)))
}

/// update_photo
///
/// [Authenticated Route] Replaces a photo. Moving it to another album also requires
/// edit rights on that album.
#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    request_body = PhotoRequest,
    responses(
        (status = 200, description = "Updated", body = Photo),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_photo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PhotoRequest>,
) -> AppResult<Json<Photo>> {
    let photo = fetch_authorized(state.photos.as_ref(), &identity, id, Capability::Edit).await?;
    if photo.album_id != payload.album_id {
        target_album(&state, &identity, payload.album_id).await?;
    }
    let photo = write_update(state.photos.as_ref(), &identity, id, payload).await?;
    Ok(Json(photo))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_photo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    delete_guarded(state.photos.as_ref(), &identity, id).await?;
    Ok(Json(deleted_message("Photo")))
}
