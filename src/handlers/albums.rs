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
    models::{Album, AlbumRequest, ApiMessage, Photo},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::{AlbumScope, PhotoScope, relations},
};

/// get_albums
///
/// [Public Route] Lists all albums, newest first.
#[utoipa::path(
    get,
    path = "/api/albums",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of albums", body = PagedEnvelope<Album>),
        (status = 400, description = "Invalid page or size")
    )
)]
pub async fn get_albums(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Album>>> {
    let page = list_page(
        state.albums.as_ref(),
        AlbumScope::All,
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Found", body = Album),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Album>> {
    Ok(Json(fetch(state.albums.as_ref(), id).await?))
}

/// get_album_photos
///
/// [Public Route] Lists the photos of an album. The album must exist.
#[utoipa::path(
    get,
    path = "/api/albums/{id}/photos",
    params(("id" = i64, Path, description = "Album ID"), PageQuery),
    responses(
        (status = 200, description = "Page of photos", body = PagedEnvelope<Photo>),
        (status = 404, description = "Album Not Found")
    )
)]
pub async fn get_album_photos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Photo>>> {
    fetch(state.albums.as_ref(), id).await?;
    let page = list_page(
        state.photos.as_ref(),
        PhotoScope::Album(id),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/albums",
    request_body = AlbumRequest,
    responses((status = 201, description = "Created", body = Album))
)]
pub async fn create_album(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<AlbumRequest>,
) -> AppResult<(StatusCode, Json<Album>)> {
    let album = state.albums.insert(identity.id(), payload).await?;
    tracing::info!(album_id = album.id, user_id = identity.id(), "album created");
    Ok((StatusCode::CREATED, Json(album)))
}

/// update_album
///
/// [Authenticated Route] Renames an album. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    request_body = AlbumRequest,
    responses(
        (status = 200, description = "Updated", body = Album),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_album(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AlbumRequest>,
) -> AppResult<Json<Album>> {
    Ok(Json(update_guarded(state.albums.as_ref(), &identity, id, payload).await?))
}

/// delete_album
///
/// [Authenticated Route] Deletes an album together with its photos. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_album(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    fetch_authorized(state.albums.as_ref(), &identity, id, Capability::Delete).await?;
    let removed =
        relations::delete_album(state.albums.as_ref(), state.photos.as_ref(), id).await?;
    confirm_deleted::<Album>(removed, &identity, id)?;
    Ok(Json(deleted_message("Album")))
}
