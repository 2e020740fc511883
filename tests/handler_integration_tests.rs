use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use blog_api::{
    AppState,
    config::AppConfig,
    error::AppError,
    handlers::{albums, categories, comments, photos, posts, tags, todos, users},
    models::{
        Album, Category, Comment, CommentRequest, NameRequest, NewUser, Photo, PhotoRequest, Post,
        PostRequest, Tag, Todo, TodoRequest, User, UserUpdate,
    },
    pagination::PageQuery,
    policy::{Identity, Role},
    repository::{MemoryStore, MemoryUserStore, ResourceStore, UserStore},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

// --- Fixture ---

const ALICE: i64 = 1;
const BOB: i64 = 2;
const ROOT: i64 = 3;

/// Memory-backed state plus direct handles on each store, so tests can inspect
/// what a handler did (or did not) write.
struct Fixture {
    state: AppState,
    posts: Arc<MemoryStore<Post>>,
    comments: Arc<MemoryStore<Comment>>,
    categories: Arc<MemoryStore<Category>>,
    tags: Arc<MemoryStore<Tag>>,
    albums: Arc<MemoryStore<Album>>,
    photos: Arc<MemoryStore<Photo>>,
    todos: Arc<MemoryStore<Todo>>,
    users: Arc<MemoryUserStore>,
}

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn account(id: i64, username: &str, roles: Vec<Role>) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@blog.test"),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        roles,
        created_at: at(0),
    }
}

fn post(id: i64, user_id: i64, minutes: i64) -> Post {
    Post {
        id,
        user_id,
        category_id: 1,
        title: format!("Post {id}"),
        body: "body".to_string(),
        tags: vec![1],
        created_at: at(minutes),
        updated_at: at(minutes),
    }
}

fn comment(id: i64, post_id: i64, user_id: i64, minutes: i64) -> Comment {
    Comment {
        id,
        post_id,
        user_id,
        body: format!("Comment {id}"),
        created_at: at(minutes),
        updated_at: at(minutes),
    }
}

fn fixture() -> Fixture {
    let users = Arc::new(MemoryUserStore::with_users(vec![
        account(ALICE, "alice", vec![Role::User]),
        account(BOB, "bob", vec![Role::User]),
        account(ROOT, "root", vec![Role::User, Role::Admin]),
    ]));
    let posts = Arc::new(MemoryStore::with_rows(vec![
        post(1, ALICE, 1),
        post(2, ALICE, 2),
        post(3, BOB, 3),
    ]));
    let comments = Arc::new(MemoryStore::with_rows(vec![
        comment(1, 1, BOB, 5),
        comment(2, 1, ALICE, 4),
        comment(3, 3, ALICE, 6),
    ]));
    let categories = Arc::new(MemoryStore::with_rows(vec![Category {
        id: 1,
        user_id: ALICE,
        name: "Rust".to_string(),
        created_at: at(0),
        updated_at: at(0),
    }]));
    let tags = Arc::new(MemoryStore::with_rows(vec![Tag {
        id: 1,
        user_id: ALICE,
        name: "async".to_string(),
        created_at: at(0),
        updated_at: at(0),
    }]));
    let albums = Arc::new(MemoryStore::with_rows(vec![
        Album {
            id: 1,
            user_id: ALICE,
            title: "Holiday".to_string(),
            created_at: at(0),
            updated_at: at(0),
        },
        Album {
            id: 2,
            user_id: BOB,
            title: "Cats".to_string(),
            created_at: at(1),
            updated_at: at(1),
        },
    ]));
    let photos = Arc::new(MemoryStore::with_rows(vec![Photo {
        id: 1,
        user_id: ALICE,
        album_id: 1,
        title: "Beach".to_string(),
        url: "https://img.test/beach.png".to_string(),
        thumbnail_url: "https://img.test/beach_t.png".to_string(),
        created_at: at(0),
        updated_at: at(0),
    }]));
    let todos = Arc::new(MemoryStore::with_rows(vec![
        Todo {
            id: 1,
            user_id: ALICE,
            title: "Write post".to_string(),
            completed: false,
            created_at: at(0),
            updated_at: at(0),
        },
        Todo {
            id: 2,
            user_id: BOB,
            title: "Feed cats".to_string(),
            completed: false,
            created_at: at(1),
            updated_at: at(1),
        },
    ]));

    let state = AppState {
        posts: posts.clone(),
        comments: comments.clone(),
        categories: categories.clone(),
        tags: tags.clone(),
        albums: albums.clone(),
        photos: photos.clone(),
        todos: todos.clone(),
        users: users.clone(),
        config: AppConfig::default(),
    };

    Fixture {
        state,
        posts,
        comments,
        categories,
        tags,
        albums,
        photos,
        todos,
        users,
    }
}

fn alice() -> Identity {
    Identity::new(ALICE, "alice", [Role::User])
}

fn bob() -> Identity {
    Identity::new(BOB, "bob", [Role::User])
}

fn root() -> Identity {
    Identity::new(ROOT, "root", [Role::User, Role::Admin])
}

fn page(page: i64, size: i64) -> Query<PageQuery> {
    Query(PageQuery {
        page: Some(page),
        size: Some(size),
    })
}

// --- Posts ---

#[tokio::test]
async fn test_owner_can_delete_own_post() {
    let fx = fixture();
    let result = posts::delete_post(alice(), State(fx.state.clone()), Path(1)).await;

    let Json(message) = result.unwrap();
    assert!(message.success);
    assert_eq!(message.message, "You successfully deleted post");
    assert_eq!(fx.posts.len(), 2);
    // Both comments on post 1 went with it; the one on Bob's post stays.
    assert_eq!(fx.comments.len(), 1);
    assert!(fx.comments.find_by_id(3).await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_can_delete_any_post() {
    let fx = fixture();
    let result = posts::delete_post(root(), State(fx.state.clone()), Path(1)).await;

    assert!(result.is_ok());
    assert_eq!(fx.posts.len(), 2);
}

#[tokio::test]
async fn test_denied_delete_leaves_store_untouched() {
    let fx = fixture();
    let err = posts::delete_post(bob(), State(fx.state.clone()), Path(1))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    assert_eq!(fx.posts.writes(), 0);
    assert_eq!(fx.posts.len(), 3);
    assert_eq!(fx.comments.writes(), 0);
}

#[tokio::test]
async fn test_missing_post_is_not_found_before_authorization() {
    let fx = fixture();
    // Bob would be denied on any existing post; a missing one must still read as 404.
    let err = posts::delete_post(bob(), State(fx.state.clone()), Path(404))
        .await
        .unwrap_err();

    match err {
        AppError::NotFound(message) => assert_eq!(message, "Post not found with id 404"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(fx.posts.writes(), 0);
}

#[tokio::test]
async fn test_update_post_keeps_owner() {
    let fx = fixture();
    let payload = PostRequest {
        title: "Edited".to_string(),
        body: "new body".to_string(),
        category_id: 1,
        tags: vec![1, 1],
    };
    let Json(updated) = posts::update_post(root(), State(fx.state.clone()), Path(1), Json(payload))
        .await
        .unwrap();

    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.user_id, ALICE);
    assert_eq!(updated.tags, vec![1]);
}

#[tokio::test]
async fn test_create_post_requires_existing_category_and_tags() {
    let fx = fixture();
    let bad_tag = PostRequest {
        title: "t".to_string(),
        body: "b".to_string(),
        category_id: 1,
        tags: vec![1, 77],
    };
    let err = posts::create_post(bob(), State(fx.state.clone()), Json(bad_tag))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Tag not found with id 77"));
    assert_eq!(fx.posts.writes(), 0);

    let ok = PostRequest {
        title: "t".to_string(),
        body: "b".to_string(),
        category_id: 1,
        tags: vec![],
    };
    let (status, Json(created)) = posts::create_post(bob(), State(fx.state.clone()), Json(ok))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.user_id, BOB);
    assert_eq!(created.id, 4);
}

#[tokio::test]
async fn test_list_posts_newest_first_with_envelope() {
    let fx = fixture();
    let Json(envelope) = posts::get_posts(State(fx.state.clone()), page(0, 2))
        .await
        .unwrap();

    let ids: Vec<i64> = envelope.content.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(envelope.total_elements, 3);
    assert_eq!(envelope.total_pages, 2);
    assert!(!envelope.is_last);
}

#[tokio::test]
async fn test_list_posts_rejects_oversized_page() {
    let fx = fixture();
    let err = posts::get_posts(State(fx.state.clone()), page(0, 31))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_posts_by_unknown_category_is_not_found() {
    let fx = fixture();
    let err = posts::get_posts_by_category(State(fx.state.clone()), Path(9), page(0, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let Json(by_tag) = posts::get_posts_by_tag(State(fx.state.clone()), Path(1), page(0, 10))
        .await
        .unwrap();
    assert_eq!(by_tag.total_elements, 3);
}

// --- Comments ---

#[tokio::test]
async fn test_comments_listed_oldest_first() {
    let fx = fixture();
    let Json(envelope) = comments::get_comments(State(fx.state.clone()), Path(1), page(0, 10))
        .await
        .unwrap();

    let ids: Vec<i64> = envelope.content.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(envelope.is_last);
}

#[tokio::test]
async fn test_comment_through_wrong_post_is_bad_request() {
    let fx = fixture();
    let err = comments::delete_comment(alice(), State(fx.state.clone()), Path((1, 3)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Comment does not belong to post"));
    assert_eq!(fx.comments.writes(), 0);
}

#[tokio::test]
async fn test_post_owner_cannot_edit_someone_elses_comment() {
    let fx = fixture();
    let payload = CommentRequest {
        body: "rewritten".to_string(),
    };
    let err =
        comments::update_comment(alice(), State(fx.state.clone()), Path((1, 1)), Json(payload))
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.comments.writes(), 0);
}

#[tokio::test]
async fn test_add_comment_to_missing_post() {
    let fx = fixture();
    let payload = CommentRequest {
        body: "hello".to_string(),
    };
    let err = comments::add_comment(bob(), State(fx.state.clone()), Path(99), Json(payload))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Post not found with id 99"));
    assert!(fx.comments.len() == 3);
}

// --- Categories & Tags ---

fn name(value: &str) -> Json<NameRequest> {
    Json(NameRequest {
        name: value.to_string(),
    })
}

#[tokio::test]
async fn test_category_is_owned_by_its_creator() {
    let fx = fixture();
    let (status, Json(category)) =
        categories::create_category(bob(), State(fx.state.clone()), name("Cooking"))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category.user_id, BOB);

    let err = categories::update_category(
        alice(),
        State(fx.state.clone()),
        Path(category.id),
        name("Mine"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let Json(renamed) = categories::update_category(
        bob(),
        State(fx.state.clone()),
        Path(category.id),
        name("Baking"),
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Baking");
    assert_eq!(renamed.user_id, BOB);
}

#[tokio::test]
async fn test_owner_can_delete_unused_category() {
    let fx = fixture();
    let (_, Json(category)) =
        categories::create_category(bob(), State(fx.state.clone()), name("Empty"))
            .await
            .unwrap();

    let Json(message) =
        categories::delete_category(bob(), State(fx.state.clone()), Path(category.id))
            .await
            .unwrap();
    assert_eq!(message.message, "You successfully deleted category");
    assert_eq!(fx.categories.len(), 1);
}

#[tokio::test]
async fn test_denied_category_delete_writes_nothing() {
    let fx = fixture();
    let err = categories::delete_category(bob(), State(fx.state.clone()), Path(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.categories.writes(), 0);
    assert_eq!(fx.posts.writes(), 0);
}

#[tokio::test]
async fn test_admin_can_delete_someone_elses_unused_tag() {
    let fx = fixture();
    let (_, Json(tag)) = tags::create_tag(bob(), State(fx.state.clone()), name("unused"))
        .await
        .unwrap();

    let err = tags::delete_tag(alice(), State(fx.state.clone()), Path(tag.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.tags.writes(), 1);

    tags::delete_tag(root(), State(fx.state.clone()), Path(tag.id))
        .await
        .unwrap();
    assert!(fx.tags.find_by_id(tag.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_category_and_tag_are_not_found_before_authorization() {
    let fx = fixture();
    let err = categories::delete_category(bob(), State(fx.state.clone()), Path(404))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Category not found with id 404"));

    let err = tags::update_tag(bob(), State(fx.state.clone()), Path(404), name("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Tag not found with id 404"));
    assert_eq!(fx.tags.writes(), 0);
}

#[tokio::test]
async fn test_category_owner_cannot_delete_other_users_posts() {
    let fx = fixture();
    // Alice owns category 1, which also files Bob's post 3.
    let err = categories::delete_category(alice(), State(fx.state.clone()), Path(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

    assert_eq!(fx.categories.writes(), 0);
    assert_eq!(fx.posts.writes(), 0);
    assert_eq!(fx.posts.len(), 3);
    assert_eq!(fx.comments.len(), 3);
    assert!(fx.categories.find_by_id(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_tag_in_use_is_kept_even_for_admin() {
    let fx = fixture();
    let err = tags::delete_tag(root(), State(fx.state.clone()), Path(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict(ref m) if m == "Tag with id 1 is still used by 3 post(s)"
    ));
    assert_eq!(fx.tags.writes(), 0);

    let Json(by_tag) = posts::get_posts_by_tag(State(fx.state.clone()), Path(1), page(0, 10))
        .await
        .unwrap();
    assert_eq!(by_tag.total_elements, 3);
}

// --- Albums & Photos ---

#[tokio::test]
async fn test_album_delete_takes_its_photos() {
    let fx = fixture();
    let err = albums::delete_album(bob(), State(fx.state.clone()), Path(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.photos.writes(), 0);

    albums::delete_album(alice(), State(fx.state.clone()), Path(1))
        .await
        .unwrap();
    assert!(fx.albums.find_by_id(1).await.unwrap().is_none());
    assert!(fx.photos.is_empty());
}

#[tokio::test]
async fn test_photo_cannot_be_added_to_foreign_album() {
    let fx = fixture();
    let payload = PhotoRequest {
        title: "Sneaky".to_string(),
        url: "u".to_string(),
        thumbnail_url: "t".to_string(),
        album_id: 2,
    };
    let err = photos::add_photo(alice(), State(fx.state.clone()), Json(payload))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.photos.writes(), 0);
}

#[tokio::test]
async fn test_admin_upload_is_owned_by_album_owner() {
    let fx = fixture();
    let payload = PhotoRequest {
        title: "Tabby".to_string(),
        url: "u".to_string(),
        thumbnail_url: "t".to_string(),
        album_id: 2,
    };
    let (status, Json(photo)) = photos::add_photo(root(), State(fx.state.clone()), Json(payload))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(photo.user_id, BOB);
}

#[tokio::test]
async fn test_moving_photo_needs_edit_on_target_album() {
    let fx = fixture();
    let payload = PhotoRequest {
        title: "Beach".to_string(),
        url: "u".to_string(),
        thumbnail_url: "t".to_string(),
        album_id: 2,
    };
    let err = photos::update_photo(alice(), State(fx.state.clone()), Path(1), Json(payload))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.photos.writes(), 0);
}

#[tokio::test]
async fn test_album_photos_listing() {
    let fx = fixture();
    let Json(envelope) = albums::get_album_photos(State(fx.state.clone()), Path(1), page(0, 5))
        .await
        .unwrap();
    assert_eq!(envelope.total_elements, 1);
    assert_eq!(envelope.content[0].title, "Beach");

    let err = albums::get_album_photos(State(fx.state.clone()), Path(50), page(0, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- Todos ---

#[tokio::test]
async fn test_todos_listing_only_shows_own() {
    let fx = fixture();
    let Json(envelope) = todos::get_todos(bob(), State(fx.state.clone()), page(0, 10))
        .await
        .unwrap();
    assert_eq!(envelope.total_elements, 1);
    assert_eq!(envelope.content[0].user_id, BOB);
}

#[tokio::test]
async fn test_complete_and_uncomplete_todo() {
    let fx = fixture();
    let Json(done) = todos::complete_todo(alice(), State(fx.state.clone()), Path(1))
        .await
        .unwrap();
    assert!(done.completed);
    assert_eq!(done.title, "Write post");

    let Json(open) = todos::uncomplete_todo(alice(), State(fx.state.clone()), Path(1))
        .await
        .unwrap();
    assert!(!open.completed);

    let err = todos::complete_todo(alice(), State(fx.state.clone()), Path(2))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.todos.writes(), 2);
}

#[tokio::test]
async fn test_update_todo_by_admin() {
    let fx = fixture();
    let payload = TodoRequest {
        title: "Feed all cats".to_string(),
        completed: true,
    };
    let Json(todo) = todos::update_todo(root(), State(fx.state.clone()), Path(2), Json(payload))
        .await
        .unwrap();
    assert_eq!(todo.user_id, BOB);
    assert!(todo.completed);
}

// --- Users ---

#[tokio::test]
async fn test_profile_counts_posts() {
    let fx = fixture();
    let Json(profile) = users::get_profile(State(fx.state.clone()), Path("alice".to_string()))
        .await
        .unwrap();
    assert_eq!(profile.post_count, 2);
    assert_eq!(profile.id, ALICE);
}

#[tokio::test]
async fn test_user_may_not_edit_another_profile() {
    let fx = fixture();
    let update = UserUpdate {
        first_name: Some("Mallory".to_string()),
        ..UserUpdate::default()
    };
    let err = users::update_user(
        bob(),
        State(fx.state.clone()),
        Path("alice".to_string()),
        Json(update),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() {
    let fx = fixture();
    let update = UserUpdate {
        email: Some("bob@blog.test".to_string()),
        ..UserUpdate::default()
    };
    let err = users::update_user(
        alice(),
        State(fx.state.clone()),
        Path("alice".to_string()),
        Json(update),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_only_admin_creates_users() {
    let fx = fixture();
    let new_user = NewUser {
        username: "carol".to_string(),
        email: "carol@blog.test".to_string(),
        first_name: "Carol".to_string(),
        last_name: "Tester".to_string(),
    };

    let err = users::create_user(alice(), State(fx.state.clone()), Json(new_user.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let (status, Json(created)) =
        users::create_user(root(), State(fx.state.clone()), Json(new_user.clone()))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.roles, vec![Role::User]);

    let err = users::create_user(root(), State(fx.state.clone()), Json(new_user))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_give_and_take_admin() {
    let fx = fixture();
    users::give_admin(root(), State(fx.state.clone()), Path("bob".to_string()))
        .await
        .unwrap();
    let bob_user = fx.users.find_by_username("bob").await.unwrap().unwrap();
    assert_eq!(bob_user.roles, vec![Role::User, Role::Admin]);

    users::take_admin(root(), State(fx.state.clone()), Path("bob".to_string()))
        .await
        .unwrap();
    let bob_user = fx.users.find_by_username("bob").await.unwrap().unwrap();
    assert_eq!(bob_user.roles, vec![Role::User]);

    let err = users::give_admin(bob(), State(fx.state.clone()), Path("nobody".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_user_can_delete_own_account() {
    let fx = fixture();
    let Json(message) =
        users::delete_user(bob(), State(fx.state.clone()), Path("bob".to_string()))
            .await
            .unwrap();
    assert!(message.success);

    let err = users::get_profile(State(fx.state.clone()), Path("bob".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Bob's post 3 goes with Alice's comment on it, as does Bob's comment on post 1.
    assert!(fx.posts.find_by_id(3).await.unwrap().is_none());
    assert_eq!(fx.posts.len(), 2);
    assert!(fx.comments.find_by_id(1).await.unwrap().is_none());
    assert!(fx.comments.find_by_id(3).await.unwrap().is_none());
    assert!(fx.comments.find_by_id(2).await.unwrap().is_some());
    assert!(fx.albums.find_by_id(2).await.unwrap().is_none());
    assert!(fx.todos.find_by_id(2).await.unwrap().is_none());
    assert!(fx.todos.find_by_id(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_account_deletion_refused_while_category_is_shared() {
    let fx = fixture();
    // Alice's category and tag also carry Bob's post 3.
    let err = users::delete_user(root(), State(fx.state.clone()), Path("alice".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert!(fx.users.find_by_id(ALICE).await.unwrap().is_some());
    assert_eq!(fx.posts.writes(), 0);
    assert_eq!(fx.comments.writes(), 0);
    assert_eq!(fx.albums.writes(), 0);
    assert_eq!(fx.photos.writes(), 0);
    assert_eq!(fx.todos.writes(), 0);
    assert_eq!(fx.categories.writes(), 0);
    assert_eq!(fx.tags.writes(), 0);
}
