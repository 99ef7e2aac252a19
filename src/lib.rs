//! AssetTrack API Library
//!
//! This crate provides the core functionality for the AssetTrack API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod graphql;
pub mod handlers;
pub mod middleware_helpers;
pub mod services;
pub mod tracing;
pub mod webhooks;

pub mod openapi;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::AuthRouterExt;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub auth_service: Arc<auth::AuthService>,
    pub google_verifier: Option<Arc<auth::oauth2::GoogleTokenVerifier>>,
    pub google_oauth: Option<auth::oauth2::GoogleOAuthConfig>,
}

// Common response wrappers
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Versioned REST API with per-resource permission gating
pub fn api_v1_routes() -> Router<AppState> {
    // Assets routes with permission gating
    let assets_read = Router::new()
        .route("/assets", get(handlers::assets::list_assets))
        .route("/assets/{id}", get(handlers::assets::get_asset))
        .route(
            "/assets/by-tag/{tag}",
            get(handlers::assets::get_asset_by_tag),
        )
        .with_permission(perm::ASSETS_READ);

    let assets_create = Router::new()
        .route(
            "/assets",
            axum::routing::post(handlers::assets::create_asset),
        )
        .with_permission(perm::ASSETS_CREATE);

    let assets_update = Router::new()
        .route(
            "/assets/{id}",
            axum::routing::put(handlers::assets::update_asset),
        )
        .route(
            "/assets/{id}/retire",
            axum::routing::post(handlers::assets::retire_asset),
        )
        .with_permission(perm::ASSETS_UPDATE);

    let assets_delete = Router::new()
        .route(
            "/assets/{id}",
            axum::routing::delete(handlers::assets::delete_asset),
        )
        .with_permission(perm::ASSETS_DELETE);

    // Asset holder routes
    let holders_read = Router::new()
        .route("/asset-holders", get(handlers::asset_holders::list_holders))
        .route(
            "/asset-holders/{id}",
            get(handlers::asset_holders::get_holder),
        )
        .with_permission(perm::HOLDERS_READ);

    let holders_manage = Router::new()
        .route(
            "/asset-holders",
            axum::routing::post(handlers::asset_holders::create_holder),
        )
        .route(
            "/asset-holders/{id}",
            axum::routing::put(handlers::asset_holders::update_holder),
        )
        .route(
            "/asset-holders/{id}/deactivate",
            axum::routing::post(handlers::asset_holders::deactivate_holder),
        )
        .with_permission(perm::HOLDERS_MANAGE);

    // Assignment routes
    let assignments_read = Router::new()
        .route("/assignments", get(handlers::assignments::list_assignments))
        .route(
            "/assignments/{id}",
            get(handlers::assignments::get_assignment),
        )
        .with_permission(perm::ASSIGNMENTS_READ);

    let assignments_create = Router::new()
        .route(
            "/assignments",
            axum::routing::post(handlers::assignments::create_assignment),
        )
        .with_permission(perm::ASSIGNMENTS_CREATE);

    let assignments_update = Router::new()
        .route(
            "/assignments/{id}/return",
            axum::routing::post(handlers::assignments::return_assignment),
        )
        .route(
            "/assignments/sweep-overdue",
            axum::routing::post(handlers::assignments::sweep_overdue),
        )
        .with_permission(perm::ASSIGNMENTS_UPDATE);

    // Maintenance routes
    let maintenance_read = Router::new()
        .route("/maintenance-logs", get(handlers::maintenance::list_logs))
        .route("/maintenance-logs/{id}", get(handlers::maintenance::get_log))
        .with_permission(perm::MAINTENANCE_READ);

    let maintenance_manage = Router::new()
        .route(
            "/maintenance-logs",
            axum::routing::post(handlers::maintenance::schedule_maintenance),
        )
        .route(
            "/maintenance-logs/{id}/start",
            axum::routing::post(handlers::maintenance::start_maintenance),
        )
        .route(
            "/maintenance-logs/{id}/complete",
            axum::routing::post(handlers::maintenance::complete_maintenance),
        )
        .route(
            "/maintenance-logs/{id}/cancel",
            axum::routing::post(handlers::maintenance::cancel_maintenance),
        )
        .with_permission(perm::MAINTENANCE_MANAGE);

    // Shipments routes
    let shipments_read = Router::new()
        .route("/shipments", get(handlers::shipments::list_shipments))
        .route("/shipments/{id}", get(handlers::shipments::get_shipment))
        .route(
            "/shipments/track/{tracking_number}",
            get(handlers::shipments::track_by_number),
        )
        .with_permission(perm::SHIPMENTS_READ);

    let shipments_create = Router::new()
        .route(
            "/shipments",
            axum::routing::post(handlers::shipments::create_shipment),
        )
        .with_permission(perm::SHIPMENTS_CREATE);

    let shipments_update = Router::new()
        .route(
            "/shipments/{id}/dispatch",
            axum::routing::post(handlers::shipments::dispatch_shipment),
        )
        .route(
            "/shipments/{id}/deliver",
            axum::routing::post(handlers::shipments::deliver_shipment),
        )
        .route(
            "/shipments/{id}/cancel",
            axum::routing::post(handlers::shipments::cancel_shipment),
        )
        .with_permission(perm::SHIPMENTS_UPDATE);

    // Return request routes
    let returns_read = Router::new()
        .route("/return-requests", get(handlers::returns::list_returns))
        .route("/return-requests/{id}", get(handlers::returns::get_return))
        .with_permission(perm::RETURNS_READ);

    let returns_create = Router::new()
        .route(
            "/return-requests",
            axum::routing::post(handlers::returns::submit_return),
        )
        .with_permission(perm::RETURNS_CREATE);

    let returns_resolve = Router::new()
        .route(
            "/return-requests/{id}/approve",
            axum::routing::post(handlers::returns::approve_return),
        )
        .route(
            "/return-requests/{id}/reject",
            axum::routing::post(handlers::returns::reject_return),
        )
        .route(
            "/return-requests/{id}/complete",
            axum::routing::post(handlers::returns::complete_return),
        )
        .with_permission(perm::RETURNS_RESOLVE);

    // Customer routes
    let customers_read = Router::new()
        .route("/customers", get(handlers::customers::list_customers))
        .route("/customers/{id}", get(handlers::customers::get_customer))
        .with_permission(perm::CUSTOMERS_READ);

    let customers_manage = Router::new()
        .route(
            "/customers",
            axum::routing::post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            axum::routing::put(handlers::customers::update_customer),
        )
        .route(
            "/customers/{id}",
            axum::routing::delete(handlers::customers::delete_customer),
        )
        .with_permission(perm::CUSTOMERS_MANAGE);

    // Product routes
    let products_read = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/products/{id}", get(handlers::products::get_product))
        .with_permission(perm::PRODUCTS_READ);

    let products_manage = Router::new()
        .route(
            "/products",
            axum::routing::post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            axum::routing::put(handlers::products::update_product),
        )
        .with_permission(perm::PRODUCTS_MANAGE);

    // Order routes
    let orders_read = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/{id}", get(handlers::orders::get_order))
        .with_permission(perm::ORDERS_READ);

    let orders_create = Router::new()
        .route(
            "/orders",
            axum::routing::post(handlers::orders::create_order),
        )
        .with_permission(perm::ORDERS_CREATE);

    let orders_update = Router::new()
        .route(
            "/orders/{id}/confirm",
            axum::routing::post(handlers::orders::confirm_order),
        )
        .route(
            "/orders/{id}/fulfill",
            axum::routing::post(handlers::orders::fulfill_order),
        )
        .route(
            "/orders/{id}/cancel",
            axum::routing::post(handlers::orders::cancel_order),
        )
        .with_permission(perm::ORDERS_UPDATE);

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Assets API (auth + permissions)
        .merge(assets_read)
        .merge(assets_create)
        .merge(assets_update)
        .merge(assets_delete)
        // Holders API
        .merge(holders_read)
        .merge(holders_manage)
        // Assignments API
        .merge(assignments_read)
        .merge(assignments_create)
        .merge(assignments_update)
        // Maintenance API
        .merge(maintenance_read)
        .merge(maintenance_manage)
        // Shipments API
        .merge(shipments_read)
        .merge(shipments_create)
        .merge(shipments_update)
        // Returns API
        .merge(returns_read)
        .merge(returns_create)
        .merge(returns_resolve)
        // Commerce records
        .merge(customers_read)
        .merge(customers_manage)
        .merge(products_read)
        .merge(products_manage)
        .merge(orders_read)
        .merge(orders_create)
        .merge(orders_update)
}

/// Auth routes the original frontend calls directly under /api
pub fn api_auth_routes() -> Router<AppState> {
    let current_user = Router::new()
        .route("/me", get(handlers::auth::me))
        .with_auth();

    Router::new()
        .route("/login", axum::routing::post(handlers::auth::login))
        .route("/register", axum::routing::post(handlers::auth::register))
        .route(
            "/google-login",
            get(handlers::auth::google_login_url).post(handlers::auth::google_login),
        )
        .route("/refresh", axum::routing::post(handlers::auth::refresh))
        .merge(current_user)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "assettrack-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }
}
