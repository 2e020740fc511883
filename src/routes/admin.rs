use crate::{AppState, handlers::users};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// Account administration. Wrapped in the auth layer like the authenticated router;
/// the ADMIN role is then checked by each handler, and anyone else gets 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /api/users
        // Mirrors an account from the identity provider. Duplicate username or email → 409.
        .route("/api/users", post(users::create_user))
        // PUT /api/users/{username}/give-admin
        .route("/api/users/{username}/give-admin", put(users::give_admin))
        // PUT /api/users/{username}/take-admin
        // Leaves the account with the USER role only.
        .route("/api/users/{username}/take-admin", put(users::take_admin))
}
