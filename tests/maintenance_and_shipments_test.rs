//! Integration tests covering maintenance logs, shipments, and the commerce
//! records (customers, products, orders).

mod common;

use axum::http::Method;
use common::{response_json, seed_asset, TestApp};
use serde_json::json;

#[tokio::test]
async fn maintenance_cycle_moves_asset_through_states() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "MT-0001").await;

    // Schedule: asset goes InMaintenance
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/maintenance-logs",
            Some(json!({
                "asset_id": asset_id,
                "maintenance_type": "repair",
                "description": "Replace battery"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let log_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "Scheduled");

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "In Maintenance");

    // The asset cannot be assigned while in maintenance
    let holder_id = common::seed_holder(&app, "mt@test.local").await;
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/assignments",
            Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Start then complete
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/maintenance-logs/{}/start", log_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/maintenance-logs/{}/complete", log_id),
            Some(json!({ "cost": "42.50", "performed_by": "ACME Repairs" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Completed");
    assert_eq!(body["data"]["performed_by"], "ACME Repairs");

    // Asset released
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Available");

    // Completed logs cannot be started again
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/maintenance-logs/{}/start", log_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn asset_stays_in_maintenance_until_last_log_closes() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "MT-0002").await;

    let mut log_ids = Vec::new();
    for description in ["Screen repair", "Keyboard swap"] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/maintenance-logs",
                Some(json!({
                    "asset_id": asset_id,
                    "maintenance_type": "repair",
                    "description": description
                })),
            )
            .await;
        let body = response_json(response).await;
        log_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    // Cancel the first; the second is still open
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/maintenance-logs/{}/cancel", log_ids[0]),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "In Maintenance");

    // Cancel the second; asset releases
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/maintenance-logs/{}/cancel", log_ids[1]),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Available");
}

#[tokio::test]
async fn shipment_cycle_updates_asset_location() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "SH-0001").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "asset_id": asset_id,
                "tracking_number": "1Z999AA10123456784",
                "carrier": "ups",
                "origin": "Test lab",
                "destination": "Portland office",
                "recipient_name": "Facilities"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let shipment_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "Pending");
    assert!(body["data"]["tracking_url"]
        .as_str()
        .unwrap()
        .contains("1Z999AA10123456784"));

    // Pending shipments leave the asset Available
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Available");

    // Dispatch: asset InTransit
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{}/dispatch", shipment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "In Transit");

    // Deliver: asset Available at the destination
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{}/deliver", shipment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/assets/{}", asset_id), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Available");
    assert_eq!(body["data"]["location"], "Portland office");

    // Delivered shipments cannot be cancelled
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{}/cancel", shipment_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);

    // Lookup by tracking number
    let response = app
        .request_authenticated(
            Method::GET,
            "/api/v1/shipments/track/1Z999AA10123456784",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], shipment_id.as_str());
}

#[tokio::test]
async fn assigned_assets_cannot_ship() {
    let app = TestApp::new().await;
    let asset_id = seed_asset(&app, "SH-0002").await;
    let holder_id = common::seed_holder(&app, "shipper@test.local").await;

    app.request_authenticated(
        Method::POST,
        "/api/v1/assignments",
        Some(json!({ "asset_id": asset_id, "holder_id": holder_id })),
    )
    .await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "asset_id": asset_id,
                "tracking_number": "1Z999AA10199999999",
                "carrier": "fedex",
                "origin": "A",
                "destination": "B",
                "recipient_name": "C"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn order_totals_are_computed_from_catalog_prices() {
    let app = TestApp::new().await;

    // Customer and products
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/customers",
            Some(json!({ "name": "Acme", "email": "buy@acme.test" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let customer_id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "sku": "CAL-01",
                "name": "Calibration service",
                "price": "149.00",
                "currency": "usd"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product_id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Order with two units
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": customer_id,
                "items": [{ "product_id": product_id, "quantity": 2 }]
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let total: f64 = body["data"]["total_amount"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(total, 298.0);
    assert_eq!(body["data"]["currency"], "USD");
    let line_total: f64 = body["data"]["items"][0]["line_total"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(line_total, 298.0);
    assert!(body["data"]["order_number"]
        .as_str()
        .unwrap()
        .starts_with("ORD-"));

    // Pending -> Confirmed -> Fulfilled
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{}/confirm", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{}/fulfill", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    // Fulfilled orders cannot cancel
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{}/cancel", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn order_with_unknown_product_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/customers",
            Some(json!({ "name": "Acme", "email": "buy2@acme.test" })),
        )
        .await;
    let customer_id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": customer_id,
                "items": [{ "product_id": uuid::Uuid::new_v4(), "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}
