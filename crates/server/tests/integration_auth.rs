//! # Authentication Integration Tests
//!
//! Login and bearer-token middleware behavior, exercised both through the
//! full router and by calling handlers directly.

mod common;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    Json,
};
use common::{authed, create_user, test_state, TEST_PASSWORD};
use entity::users::Role;
use error::AppError;
use http::{Request, StatusCode};
use sea_orm::{ActiveModelTrait, Set};
use server::{dto::users::LoginRequest, handlers::users::login_handler};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

#[tokio::test]
async fn test_health_is_public() {
    let state = test_state().await;
    let app = server::create_app_router(state);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let state = test_state().await;
    let app = server::create_app_router(state);

    let response = app
        .oneshot(Request::get("/api/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let state = test_state().await;
    let app = server::create_app_router(state);

    let response = app
        .oneshot(
            Request::get("/api/users/me")
                .header("Authorization", "Bearer not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_me_roundtrip() {
    let state = test_state().await;
    let user = create_user(&state.db, Role::Engineer, "login").await;
    let app = server::create_app_router(state);

    let login_body = serde_json::json!({
        "email": user.email,
        "password": TEST_PASSWORD,
    });
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/users/login")
                .header("Content-Type", "application/json")
                .body(Body::from(login_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("Missing token").to_string();
    assert_eq!(token, user.id.to_string());

    let response = app
        .oneshot(
            Request::get("/api/users/me")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], user.email);
    // The password hash must never appear on the wire.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let state = test_state().await;
    let user = create_user(&state.db, Role::Engineer, "uniform").await;

    // Wrong password
    let err = login_handler(
        State(state.clone()),
        Json(LoginRequest {
            email:    user.email.clone(),
            password: "wrong-password".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { ref message } if message == "Invalid credentials"));

    // Unknown email
    let err = login_handler(
        State(state.clone()),
        Json(LoginRequest {
            email:    "nobody@test.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { ref message } if message == "Invalid credentials"));

    // Deactivated account gets the same answer as a bad password
    let mut active: entity::users::ActiveModel = user.clone().into();
    active.is_active = Set(false);
    active.update(&state.db).await.unwrap();

    let err = login_handler(
        State(state.clone()),
        Json(LoginRequest {
            email:    user.email,
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { ref message } if message == "Invalid credentials"));
}

#[tokio::test]
async fn test_deactivated_token_is_rejected_by_middleware() {
    let state = test_state().await;
    let user = create_user(&state.db, Role::Engineer, "deactivated").await;

    let mut active: entity::users::ActiveModel = user.clone().into();
    active.is_active = Set(false);
    active.update(&state.db).await.unwrap();

    let app = server::create_app_router(state);
    let response = app
        .oneshot(
            Request::get("/api/users/me")
                .header("Authorization", format!("Bearer {}", user.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Account is deactivated");
}

#[tokio::test]
async fn test_authed_extension_matches_user() {
    let state = test_state().await;
    let user = create_user(&state.db, Role::Admin, "extension").await;

    let auth = authed(&user);
    assert_eq!(auth.id, user.id);
    assert_eq!(auth.role, Role::Admin);
    assert!(auth.uid.starts_with("USR-"));
}
