use crate::{AppState, handlers};
use axum::{Router, routing::get};

use handlers::{albums, categories, comments, photos, posts, tags, users};

/// Public Router Module
///
/// Read-only endpoints open to anonymous clients. Every listing takes `page`/`size`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Posts & Comments ---
        .route("/api/posts", get(posts::get_posts))
        .route("/api/posts/{id}", get(posts::get_post))
        .route("/api/posts/category/{id}", get(posts::get_posts_by_category))
        .route("/api/posts/tag/{id}", get(posts::get_posts_by_tag))
        // Comments are listed oldest first.
        .route("/api/posts/{id}/comments", get(comments::get_comments))
        .route("/api/posts/{id}/comments/{comment_id}", get(comments::get_comment))
        // --- Taxonomy ---
        .route("/api/categories", get(categories::get_categories))
        .route("/api/categories/{id}", get(categories::get_category))
        .route("/api/tags", get(tags::get_tags))
        .route("/api/tags/{id}", get(tags::get_tag))
        // --- Albums & Photos ---
        .route("/api/albums", get(albums::get_albums))
        .route("/api/albums/{id}", get(albums::get_album))
        .route("/api/albums/{id}/photos", get(albums::get_album_photos))
        .route("/api/photos", get(photos::get_photos))
        .route("/api/photos/{id}", get(photos::get_photo))
        // --- Users ---
        // Availability checks used by the sign-up form.
        .route("/api/users/check-username", get(users::check_username))
        .route("/api/users/check-email", get(users::check_email))
        .route("/api/users/{username}/profile", get(users::get_profile))
        .route("/api/users/{username}/posts", get(users::get_user_posts))
        .route("/api/users/{username}/albums", get(users::get_user_albums))
}
