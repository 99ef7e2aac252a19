//! Integration tests for the return request workflow.

mod common;

use axum::http::Method;
use common::{response_json, seed_asset, seed_holder, TestApp};
use serde_json::json;

async fn seed_active_assignment(app: &TestApp, tag: &str, email: &str) -> String {
    let asset_id = seed_asset(app, tag).await;
    let holder_id = seed_holder(app, email).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_return_flow_closes_assignment() {
    let app = TestApp::new().await;
    let assignment_id = seed_active_assignment(&app, "RET-0001", "ret1@test.local").await;

    // Submit
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/return-requests",
            Some(json!({
                "assignment_id": assignment_id,
                "requested_by": "ret1@test.local",
                "reason": "Leaving the company"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "Requested");

    // Approve
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/return-requests/{}/approve", request_id),
            Some(json!({ "resolution_notes": "Drop off at IT desk" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Approved");

    // Complete: assignment closes, request resolves
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/return-requests/{}/complete", request_id),
            Some(json!({ "condition_in": "Good" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Completed");
    assert!(body["data"]["resolved_at"].is_string());

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/assignments/{}", assignment_id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Returned");
}

#[tokio::test]
async fn rejected_requests_cannot_complete() {
    let app = TestApp::new().await;
    let assignment_id = seed_active_assignment(&app, "RET-0002", "ret2@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/return-requests",
            Some(json!({
                "assignment_id": assignment_id,
                "requested_by": "ret2@test.local",
                "reason": "Wrong model"
            })),
        )
        .await;
    let body = response_json(response).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/return-requests/{}/reject", request_id),
            Some(json!({ "resolution_notes": "Keep it until replacement arrives" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/return-requests/{}/complete", request_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);

    // The assignment is untouched
    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/assignments/{}", assignment_id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn duplicate_open_request_conflicts() {
    let app = TestApp::new().await;
    let assignment_id = seed_active_assignment(&app, "RET-0003", "ret3@test.local").await;

    let payload = json!({
        "assignment_id": assignment_id,
        "requested_by": "ret3@test.local",
        "reason": "Upgrade cycle"
    });

    let response = app
        .request_authenticated(Method::POST, "/api/v1/return-requests", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request_authenticated(Method::POST, "/api/v1/return-requests", Some(payload))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn return_for_closed_assignment_is_rejected() {
    let app = TestApp::new().await;
    let assignment_id = seed_active_assignment(&app, "RET-0004", "ret4@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/assignments/{}/return", assignment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/return-requests",
            Some(json!({
                "assignment_id": assignment_id,
                "requested_by": "ret4@test.local",
                "reason": "Already gave it back"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}
