use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

use handlers::{albums, categories, comments, photos, posts, tags, todos, users};

/// Authenticated Router Module
///
/// Mutations and personal data. The router is wrapped in the auth layer, so every
/// handler here receives a resolved `Identity`. Update and delete go through the
/// fetch → authorize → mutate template: the owner or an admin may proceed, anyone
/// else gets 403 and nothing is written.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/users/me
        .route("/api/users/me", get(users::get_me))
        // PUT/DELETE /api/users/{username}
        // A user owns its own account.
        .route(
            "/api/users/{username}",
            put(users::update_user).delete(users::delete_user),
        )
        // --- Posts & Comments ---
        .route("/api/posts", post(posts::create_post))
        .route(
            "/api/posts/{id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route("/api/posts/{id}/comments", post(comments::add_comment))
        .route(
            "/api/posts/{id}/comments/{comment_id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        // --- Taxonomy ---
        .route("/api/categories", post(categories::create_category))
        .route(
            "/api/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/api/tags", post(tags::create_tag))
        .route("/api/tags/{id}", put(tags::update_tag).delete(tags::delete_tag))
        // --- Albums & Photos ---
        .route("/api/albums", post(albums::create_album))
        .route(
            "/api/albums/{id}",
            put(albums::update_album).delete(albums::delete_album),
        )
        // Adding or moving a photo needs edit rights on the target album.
        .route("/api/photos", post(photos::add_photo))
        .route(
            "/api/photos/{id}",
            put(photos::update_photo).delete(photos::delete_photo),
        )
        // --- Todos ---
        // Listing only ever shows the caller's own todos.
        .route("/api/todos", get(todos::get_todos).post(todos::create_todo))
        .route(
            "/api/todos/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/api/todos/{id}/complete", put(todos::complete_todo))
        .route("/api/todos/{id}/uncomplete", put(todos::uncomplete_todo))
}
