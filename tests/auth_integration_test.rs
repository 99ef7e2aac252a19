//! Integration tests for registration, login, token refresh, and the
//! permission gating on the v1 API.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_login_me_round_trip() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/register",
            Some(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "a-long-password"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert!(body["data"]["access_token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["role"], "viewer");

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({
                "email": "jane@example.com",
                "password": "a-long-password"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    // /api/me with the fresh token
    let response = app
        .request_with_token(Method::GET, "/api/me", None, &token)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert!(body["data"]["last_login_at"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    app.request(
        Method::POST,
        "/api/register",
        Some(json!({
            "name": "Sam",
            "email": "sam@example.com",
            "password": "correct-password"
        })),
    )
    .await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({
                "email": "sam@example.com",
                "password": "wrong-password"
            })),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Dup",
        "email": "dup@example.com",
        "password": "some-password"
    });

    let response = app
        .request(Method::POST, "/api/register", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), 201);

    let response = app.request(Method::POST, "/api/register", Some(payload)).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn refresh_rotates_tokens() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/register",
            Some(json!({
                "name": "Refresh",
                "email": "refresh@example.com",
                "password": "some-password"
            })),
        )
        .await;
    let body = response_json(response).await;
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/api/refresh",
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["data"]["access_token"].as_str().is_some());

    // The old refresh token is revoked after rotation
    let response = app
        .request(
            Method::POST,
            "/api/refresh",
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn v1_api_requires_authentication() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/assets", None).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn viewers_can_read_but_not_write() {
    let app = TestApp::new().await;

    let response = app
        .request_as_viewer(Method::GET, "/api/v1/assets", None)
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_as_viewer(
            Method::POST,
            "/api/v1/assets",
            Some(json!({
                "asset_tag": "NO-0001",
                "name": "Should not exist",
                "category": "laptop"
            })),
        )
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn google_login_unconfigured_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/google-login",
            Some(json!({ "id_token": "anything" })),
        )
        .await;
    // Harness runs without Google credentials configured
    assert_eq!(response.status(), 400);
}
