//! Integration tests for the asset registry: creation, lookup, filtering,
//! updates, retirement, and deletion rules.

mod common;

use axum::http::Method;
use common::{response_json, seed_asset, seed_holder, TestApp};
use serde_json::json;

#[tokio::test]
async fn create_and_fetch_asset() {
    let app = TestApp::new().await;

    let payload = json!({
        "asset_tag": "IT-1001",
        "name": "ThinkPad X1",
        "category": "laptop",
        "serial_number": "PF3XYZ01",
        "location": "HQ / Floor 2"
    });

    let response = app
        .request_authenticated(Method::POST, "/api/v1/assets", Some(payload))
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert!(body["success"].as_bool().unwrap());
    let asset = &body["data"];
    assert_eq!(asset["asset_tag"], "IT-1001");
    assert_eq!(asset["status"], "Available");
    let id = asset["id"].as_str().unwrap().to_string();

    // Fetch by id
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", id), None)
        .await;
    assert_eq!(response.status(), 200);

    // Fetch by tag
    let response = app
        .request_authenticated(Method::GET, "/api/v1/assets/by-tag/IT-1001", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn duplicate_asset_tag_conflicts() {
    let app = TestApp::new().await;
    seed_asset(&app, "IT-2001").await;

    let payload = json!({
        "asset_tag": "IT-2001",
        "name": "Another device",
        "category": "phone"
    });

    let response = app
        .request_authenticated(Method::POST, "/api/v1/assets", Some(payload))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let app = TestApp::new().await;

    let payload = json!({
        "asset_tag": "IT-2002",
        "name": "Mystery device",
        "category": "hoverboard"
    });

    let response = app
        .request_authenticated(Method::POST, "/api/v1/assets", Some(payload))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn list_filters_by_status_and_search() {
    let app = TestApp::new().await;
    seed_asset(&app, "IT-3001").await;
    seed_asset(&app, "IT-3002").await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/assets?status=available", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 2);

    let response = app
        .request_authenticated(Method::GET, "/api/v1/assets?search=IT-3002", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["asset_tag"], "IT-3002");

    // Nonsense status filter yields an empty page rather than an error
    let response = app
        .request_authenticated(Method::GET, "/api/v1/assets?status=exploded", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn update_asset_fields() {
    let app = TestApp::new().await;
    let id = seed_asset(&app, "IT-4001").await;

    let payload = json!({
        "name": "Renamed asset",
        "location": "Warehouse B"
    });

    let response = app
        .request_authenticated(Method::PUT, &format!("/api/v1/assets/{}", id), Some(payload))
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Renamed asset");
    assert_eq!(body["data"]["location"], "Warehouse B");
    // Untouched fields stay
    assert_eq!(body["data"]["asset_tag"], "IT-4001");
}

#[tokio::test]
async fn retire_asset_and_block_double_retire() {
    let app = TestApp::new().await;
    let id = seed_asset(&app, "IT-5001").await;

    let response = app
        .request_authenticated(Method::POST, &format!("/api/v1/assets/{}/retire", id), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Retired");

    let response = app
        .request_authenticated(Method::POST, &format!("/api/v1/assets/{}/retire", id), None)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn assigned_assets_cannot_be_retired_or_deleted() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "IT-6001").await;
    let holder_id = seed_holder(&app, "holder6001@test.local").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/assets/{}/retire", asset_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);

    // Assets with assignment history are undeletable even after return
    let response = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn delete_only_without_history() {
    let app = TestApp::new().await;
    let id = seed_asset(&app, "IT-7001").await;

    let response = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/assets/{}", id), None)
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", id), None)
        .await;
    assert_eq!(response.status(), 404);
}
