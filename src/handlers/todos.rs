use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{
    delete_guarded, deleted_message, fetch_authorized, list_page, update_guarded, write_update,
};
use crate::{
    AppState,
    error::AppResult,
    models::{ApiMessage, Todo, TodoRequest},
    pagination::{PageQuery, PagedEnvelope, Sort},
    policy::{Capability, Identity},
    repository::TodoScope,
};

/// Flips the `completed` flag of a todo the caller may edit, keeping its title.
async fn set_completed(
    state: &AppState,
    identity: &Identity,
    id: i64,
    completed: bool,
) -> AppResult<Todo> {
    let todo = fetch_authorized(state.todos.as_ref(), identity, id, Capability::Edit).await?;
    let draft = TodoRequest {
        title: todo.title,
        completed,
    };
    write_update(state.todos.as_ref(), identity, id, draft).await
}

/// get_todos
///
/// [Authenticated Route] Lists the caller's own todos, newest first.
#[utoipa::path(
    get,
    path = "/api/todos",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of todos", body = PagedEnvelope<Todo>),
        (status = 400, description = "Invalid page or size"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_todos(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PagedEnvelope<Todo>>> {
    let page = list_page(
        state.todos.as_ref(),
        TodoScope::Owner(identity.id()),
        query,
        Sort::NEWEST_FIRST,
        &state.config,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Found", body = Todo),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    Ok(Json(fetch_authorized(state.todos.as_ref(), &identity, id, Capability::View).await?))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = TodoRequest,
    responses((status = 201, description = "Created", body = Todo))
)]
pub async fn create_todo(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<TodoRequest>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let todo = state.todos.insert(identity.id(), payload).await?;
    tracing::info!(todo_id = todo.id, user_id = identity.id(), "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Updated", body = Todo),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoRequest>,
) -> AppResult<Json<Todo>> {
    Ok(Json(update_guarded(state.todos.as_ref(), &identity, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    delete_guarded(state.todos.as_ref(), &identity, id).await?;
    Ok(Json(deleted_message("Todo")))
}

/// complete_todo
///
/// [Authenticated Route] Marks a todo done. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/todos/{id}/complete",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Completed", body = Todo),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn complete_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    Ok(Json(set_completed(&state, &identity, id, true).await?))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}/uncomplete",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Reopened", body = Todo),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn uncomplete_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    Ok(Json(set_completed(&state, &identity, id, false).await?))
}
