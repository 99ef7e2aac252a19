//! Integration tests for the assignment workflow: custody, uniqueness,
//! returns, and overdue sweeps.

mod common;

use axum::http::Method;
use chrono::{Duration, Utc};
use common::{response_json, seed_asset, seed_holder, TestApp};
use serde_json::json;

#[tokio::test]
async fn assigning_moves_asset_to_assigned() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "AS-0001").await;
    let holder_id = seed_holder(&app, "assignee@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({
                "asset_id": asset_id,
                "holder_id": holder_id,
                "condition_out": "Good"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Active");

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Assigned");
}

#[tokio::test]
async fn second_open_assignment_is_rejected() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "AS-0002").await;
    let holder_a = seed_holder(&app, "first@test.local").await;
    let holder_b = seed_holder(&app, "second@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_a })),
        )
        .await;
    assert_eq!(response.status(), 201);

    // The asset is now Assigned, so the state check fires first
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_b })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn inactive_holder_cannot_receive_assets() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "AS-0003").await;
    let holder_id = seed_holder(&app, "leaver@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/asset-holders/{}/deactivate", holder_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn returning_closes_assignment_and_releases_asset() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "AS-0004").await;
    let holder_id = seed_holder(&app, "returner@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
        )
        .await;
    let body = response_json(response).await;
    let assignment_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/assignments/{}/return", assignment_id),
            Some(json!({ "condition_in": "Scratched lid" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Returned");
    assert_eq!(body["data"]["condition_in"], "Scratched lid");
    assert!(body["data"]["returned_at"].is_string());

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Available");

    // Closing twice is invalid
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/assignments/{}/return", assignment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn overdue_sweep_flags_past_due_assignments() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "AS-0005").await;
    let holder_id = seed_holder(&app, "late@test.local").await;

    let due_yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({
                "asset_id": asset_id,
                "holder_id": holder_id,
                "due_at": due_yesterday
            })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request_authenticated(Method::POST, "/api/v1/assignments/sweep-overdue", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["flagged"], 1);

    let response = app
        .request_authenticated(Method::GET, "/api/v1/assignments?status=overdue", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 1);

    // An overdue assignment can still be returned
    let assignment_id = body["data"]["items"][0]["id"].as_str().unwrap().to_string();
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/assignments/{}/return", assignment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
}
