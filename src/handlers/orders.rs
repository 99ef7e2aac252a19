use crate::{
    entities::{order, order_item},
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::orders::{CreateOrderInput, OrderLineInput},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub customer_id: Option<Uuid>,
    /// pending, confirmed, fulfilled, or cancelled
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemSummary {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<order_item::Model> for OrderItemSummary {
    fn from(model: order_item::Model) -> Self {
        let line_total = model.line_total();
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
            line_total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    #[schema(example = "ORD-3F20ED59A1B4")]
    pub order_number: String,
    pub customer_id: Uuid,
    #[schema(example = "Pending")]
    pub status: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemSummary>>,
}

impl OrderSummary {
    fn from_order(model: order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            customer_id: model.customer_id,
            status: model.status.to_string(),
            total_amount: model.total_amount,
            currency: model.currency,
            created_at: model.created_at,
            items: None,
        }
    }

    fn with_items(model: order::Model, items: Vec<order_item::Model>) -> Self {
        let mut summary = Self::from_order(model);
        summary.items = Some(items.into_iter().map(OrderItemSummary::from).collect());
        summary
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 3, max = 3))]
    pub currency: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<OrderLineRequest>,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders listed", body = ApiResponse<PaginatedResponse<OrderSummary>>)
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<PaginatedResponse<OrderSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let (records, total) = state
        .services
        .orders
        .list_orders(page, limit, query.customer_id, query.status)
        .await?;

    let items: Vec<OrderSummary> = records.into_iter().map(OrderSummary::from_order).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order fetched with items", body = ApiResponse<OrderSummary>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderSummary> {
    match state.services.orders.get_order(id).await? {
        Some((model, items)) => Ok(Json(ApiResponse::success(OrderSummary::with_items(
            model, items,
        )))),
        None => Err(ServiceError::NotFound(format!("Order {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderSummary>),
        (status = 400, description = "Invalid items", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let input = CreateOrderInput {
        customer_id: payload.customer_id,
        currency: payload.currency,
        items: payload
            .items
            .into_iter()
            .map(|line| OrderLineInput {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
    };

    let (created, items) = state.services.orders.create_order(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(OrderSummary::with_items(
            created, items,
        ))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/confirm",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order confirmed", body = ApiResponse<OrderSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderSummary> {
    let updated = state.services.orders.confirm(id).await?;
    Ok(Json(ApiResponse::success(OrderSummary::from_order(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/fulfill",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order fulfilled", body = ApiResponse<OrderSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn fulfill_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderSummary> {
    let updated = state.services.orders.fulfill(id).await?;
    Ok(Json(ApiResponse::success(OrderSummary::from_order(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderSummary> {
    let updated = state.services.orders.cancel(id).await?;
    Ok(Json(ApiResponse::success(OrderSummary::from_order(updated))))
}
