use axum::{http::StatusCode, response::IntoResponse};
use blog_api::{
    error::AppError,
    models::{PostRequest, TodoRequest, User, UserSummary, UserUpdate},
    pagination::{PageError, PagedEnvelope},
    policy::Role,
};
use chrono::Utc;

// --- Request payloads ---

#[test]
fn test_post_request_tags_default_to_empty() {
    let json = serde_json::json!({"title": "t", "body": "b", "category_id": 3});
    let payload: PostRequest = serde_json::from_value(json).unwrap();
    assert!(payload.tags.is_empty());
    assert_eq!(payload.category_id, 3);
}

#[test]
fn test_todo_request_completed_defaults_to_false() {
    let payload: TodoRequest =
        serde_json::from_value(serde_json::json!({"title": "milk"})).unwrap();
    assert!(!payload.completed);
}

#[test]
fn test_user_update_skips_missing_fields() {
    let update = UserUpdate {
        last_name: Some("Hopper".to_string()),
        ..UserUpdate::default()
    };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({"last_name": "Hopper"}));
}

// --- Response payloads ---

#[test]
fn test_user_roles_serialize_as_names() {
    let user = User {
        id: 1,
        username: "grace".to_string(),
        email: "grace@blog.test".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        roles: vec![Role::User, Role::Admin],
        created_at: Utc::now(),
    };
    let summary = UserSummary::from(user);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["roles"], serde_json::json!(["USER", "ADMIN"]));
    assert!(json.get("email").is_none());
}

#[test]
fn test_envelope_round_trips_through_json() {
    let envelope = PagedEnvelope::assemble(vec!["a".to_string(), "b".to_string()], 0, 2, 5);
    let json = serde_json::to_string(&envelope).unwrap();
    let back: PagedEnvelope<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, envelope);
    assert!(json.contains("\"isLast\":false"));
}

// --- Error responses ---

#[test]
fn test_error_status_mapping() {
    assert_eq!(AppError::not_found("Post", 1).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::forbidden().status(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::unauthorized().status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::from(PageError::NegativePage(-1)).status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_error_body_shape() {
    let response = AppError::forbidden().into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 403);
    assert_eq!(body["message"], "You don't have permission to make this operation");
}
