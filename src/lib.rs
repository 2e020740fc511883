use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The access-control and listing core. Pure, no I/O.
pub mod pagination;
pub mod policy;

// Everything that consumes the core: persistence, identity, orchestration.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Public, authenticated and admin routers.
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use pagination::{PageRequest, PagedEnvelope, Paginator};
pub use policy::{Capability, Decision, Identity, Role, authorize};
pub use repository::{
    MemoryStore, MemoryUserStore, PostgresRepository, StoreState, UserStoreState,
};

use models::{Album, Category, Comment, Photo, Post, Tag, Todo};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and every schema used in request or
/// response bodies. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::posts::get_posts, handlers::posts::get_post,
        handlers::posts::get_posts_by_category, handlers::posts::get_posts_by_tag,
        handlers::posts::create_post, handlers::posts::update_post, handlers::posts::delete_post,
        handlers::comments::get_comments, handlers::comments::get_comment,
        handlers::comments::add_comment, handlers::comments::update_comment,
        handlers::comments::delete_comment,
        handlers::categories::get_categories, handlers::categories::get_category,
        handlers::categories::create_category, handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::tags::get_tags, handlers::tags::get_tag, handlers::tags::create_tag,
        handlers::tags::update_tag, handlers::tags::delete_tag,
        handlers::albums::get_albums, handlers::albums::get_album,
        handlers::albums::get_album_photos, handlers::albums::create_album,
        handlers::albums::update_album, handlers::albums::delete_album,
        handlers::photos::get_photos, handlers::photos::get_photo, handlers::photos::add_photo,
        handlers::photos::update_photo, handlers::photos::delete_photo,
        handlers::todos::get_todos, handlers::todos::get_todo, handlers::todos::create_todo,
        handlers::todos::update_todo, handlers::todos::delete_todo, handlers::todos::complete_todo,
        handlers::todos::uncomplete_todo,
        handlers::users::get_me, handlers::users::check_username, handlers::users::check_email,
        handlers::users::get_profile, handlers::users::get_user_posts,
        handlers::users::get_user_albums, handlers::users::update_user,
        handlers::users::delete_user, handlers::users::create_user,
        handlers::users::give_admin, handlers::users::take_admin
    ),
    components(
        schemas(
            models::User, models::Post, models::Comment, models::Category, models::Tag,
            models::Album, models::Photo, models::Todo, models::PostRequest, models::CommentRequest,
            models::NameRequest, models::AlbumRequest, models::PhotoRequest, models::TodoRequest,
            models::NewUser, models::UserUpdate, models::ApiMessage, models::Availability,
            models::UserSummary, models::UserProfile, policy::Role,
        )
    ),
    tags(
        (
            name = "blog-api",
            description = "Blog API: posts, comments, albums, photos, todos and users"
        )
    )
)]
struct ApiDoc;

/// AppState
///
/// One shared store handle per resource, the account store and the configuration.
/// In production every store slot points at the same `PostgresRepository`; tests
/// plug in `MemoryStore`s.
#[derive(Clone)]
pub struct AppState {
    pub posts: StoreState<Post>,
    pub comments: StoreState<Comment>,
    pub categories: StoreState<Category>,
    pub tags: StoreState<Tag>,
    pub albums: StoreState<Album>,
    pub photos: StoreState<Photo>,
    pub todos: StoreState<Todo>,
    pub users: UserStoreState,
    pub config: AppConfig,
}

impl AppState {
    /// Builds a state whose resource stores are all served by `repo`.
    pub fn from_repository(repo: PostgresRepository, config: AppConfig) -> Self {
        let repo = Arc::new(repo);
        Self {
            posts: repo.clone(),
            comments: repo.clone(),
            categories: repo.clone(),
            tags: repo.clone(),
            albums: repo.clone(),
            photos: repo.clone(),
            todos: repo.clone(),
            users: repo,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// The identity extractor only needs the account store and the configuration.

impl FromRef<AppState> for UserStoreState {
    fn from_ref(app_state: &AppState) -> UserStoreState {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Rejects the request with 401 unless an `Identity` can be resolved. The handler
/// extracts the identity again for its own use.
async fn auth_middleware(_identity: Identity, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the public, authenticated and admin routers, applies the auth layer to
/// the latter two and wraps everything in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // The admin role itself is checked inside the handlers, after existence checks.
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// Opens one span per request, tagged with the generated `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
