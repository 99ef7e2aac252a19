//! Integration tests for the GraphQL endpoint: queries, nested fields,
//! mutations, and role checks.

mod common;

use axum::http::Method;
use common::{response_json, seed_asset, seed_holder, TestApp};
use serde_json::json;

#[tokio::test]
async fn graphql_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/graphql",
            Some(json!({ "query": "{ assets { id } }" })),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn query_assets_with_nested_assignments() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "GQL-0001").await;
    let holder_id = seed_holder(&app, "gql@test.local").await;

    app.request_authenticated(
        Method::POST,
        "/api/v1/assignments",
        Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
    )
    .await;

    let query = r#"
        {
            assets {
                assetTag
                status
                assignments {
                    status
                    holder { email }
                }
            }
        }
    "#;

    let response = app
        .request_authenticated(Method::POST, "/graphql", Some(json!({ "query": query })))
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);

    let assets = body["data"]["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["assetTag"], "GQL-0001");
    assert_eq!(assets[0]["status"], "Assigned");
    assert_eq!(
        assets[0]["assignments"][0]["holder"]["email"],
        "gql@test.local"
    );
}

#[tokio::test]
async fn asset_by_tag_lookup() {
    let app = TestApp::new().await;
    seed_asset(&app, "GQL-0002").await;

    let query = r#"query($tag: String!) { assetByTag(tag: $tag) { name status } }"#;

    let response = app
        .request_authenticated(
            Method::POST,
            "/graphql",
            Some(json!({ "query": query, "variables": { "tag": "GQL-0002" } })),
        )
        .await;
    let body = response_json(response).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["assetByTag"]["status"], "Available");
}

#[tokio::test]
async fn mutations_pass_through_to_services() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "GQL-0003").await;
    let holder_id = seed_holder(&app, "gql3@test.local").await;

    let mutation = r#"
        mutation($assetId: ID!, $holderId: ID!) {
            assignAsset(input: { assetId: $assetId, holderId: $holderId }) {
                status
                asset { status }
            }
        }
    "#;

    let response = app
        .request_authenticated(
            Method::POST,
            "/graphql",
            Some(json!({
                "query": mutation,
                "variables": { "assetId": asset_id, "holderId": holder_id }
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["assignAsset"]["status"], "Active");
    assert_eq!(body["data"]["assignAsset"]["asset"]["status"], "Assigned");
}

#[tokio::test]
async fn state_violations_surface_as_field_errors() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "GQL-0004").await;
    let holder_id = seed_holder(&app, "gql4@test.local").await;

    let mutation = r#"
        mutation($assetId: ID!, $holderId: ID!) {
            assignAsset(input: { assetId: $assetId, holderId: $holderId }) { status }
        }
    "#;
    let variables = json!({ "assetId": asset_id, "holderId": holder_id });

    let response = app
        .request_authenticated(
            Method::POST,
            "/graphql",
            Some(json!({ "query": mutation, "variables": variables.clone() })),
        )
        .await;
    let body = response_json(response).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);

    // Second assignment of the same asset: GraphQL 200 with field error
    let response = app
        .request_authenticated(
            Method::POST,
            "/graphql",
            Some(json!({ "query": mutation, "variables": variables })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["errors"].is_array());
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert!(message.contains("Invalid operation"), "got: {}", message);
}

#[tokio::test]
async fn viewers_cannot_mutate() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "GQL-0005").await;
    let holder_id = seed_holder(&app, "gql5@test.local").await;

    let mutation = r#"
        mutation($assetId: ID!, $holderId: ID!) {
            assignAsset(input: { assetId: $assetId, holderId: $holderId }) { status }
        }
    "#;

    let response = app
        .request_as_viewer(
            Method::POST,
            "/graphql",
            Some(json!({
                "query": mutation,
                "variables": { "assetId": asset_id, "holderId": holder_id }
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert!(message.contains("Insufficient permissions"), "got: {}", message);

    // Viewers can still read
    let response = app
        .request_as_viewer(
            Method::POST,
            "/graphql",
            Some(json!({ "query": "{ assets { assetTag } }" })),
        )
        .await;
    let body = response_json(response).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
}
