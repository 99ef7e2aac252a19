use crate::{
    entities::shipment,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::shipments::CreateShipmentInput,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// pending, in_transit, delivered, or cancelled
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "990e8400-e29b-41d4-a716-446655440000",
    "asset_id": "550e8400-e29b-41d4-a716-446655440000",
    "tracking_number": "1Z999AA10123456784",
    "carrier": "UPS",
    "status": "In Transit",
    "origin": "Seattle HQ",
    "destination": "Portland office",
    "recipient_name": "Facilities"
}))]
pub struct ShipmentSummary {
    pub id: Uuid,
    pub asset_id: Uuid,
    #[schema(example = "1Z999AA10123456784")]
    pub tracking_number: String,
    #[schema(example = "UPS")]
    pub carrier: String,
    #[schema(example = "In Transit")]
    pub status: String,
    pub origin: String,
    pub destination: String,
    pub recipient_name: String,
    pub tracking_url: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shipment::Model> for ShipmentSummary {
    fn from(model: shipment::Model) -> Self {
        let tracking_url = model.tracking_url();
        Self {
            id: model.id,
            asset_id: model.asset_id,
            tracking_number: model.tracking_number,
            carrier: model.carrier.to_string(),
            status: model.status.to_string(),
            origin: model.origin,
            destination: model.destination,
            recipient_name: model.recipient_name,
            tracking_url,
            shipped_at: model.shipped_at,
            estimated_delivery: model.estimated_delivery,
            delivered_at: model.delivered_at,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "asset_id": "550e8400-e29b-41d4-a716-446655440000",
    "tracking_number": "1Z999AA10123456784",
    "carrier": "ups",
    "origin": "Seattle HQ",
    "destination": "Portland office",
    "recipient_name": "Facilities"
}))]
pub struct CreateShipmentRequest {
    pub asset_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub tracking_number: String,
    /// ups, fedex, usps, dhl, or other
    #[validate(length(min = 1))]
    pub carrier: String,
    #[validate(length(min = 1, max = 255))]
    pub origin: String,
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
    #[validate(length(min = 1))]
    pub recipient_name: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    params(ShipmentListQuery),
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<PaginatedResponse<ShipmentSummary>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<ShipmentListQuery>,
) -> ApiResult<PaginatedResponse<ShipmentSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let (records, total) = state
        .services
        .shipments
        .list_shipments(page, limit, query.status)
        .await?;

    let items: Vec<ShipmentSummary> = records.into_iter().map(ShipmentSummary::from).collect();
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
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    match state.services.shipments.get_shipment(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ShipmentSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Shipment {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate tracking number", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(payload): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let carrier = payload
        .carrier
        .parse::<shipment::ShippingCarrier>()
        .map_err(ServiceError::ValidationError)?;

    let created = state
        .services
        .shipments
        .create_shipment(CreateShipmentInput {
            asset_id: payload.asset_id,
            tracking_number: payload.tracking_number,
            carrier,
            origin: payload.origin,
            destination: payload.destination,
            recipient_name: payload.recipient_name,
            estimated_delivery: payload.estimated_delivery,
            notes: payload.notes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ShipmentSummary::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/dispatch",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment dispatched", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn dispatch_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    let updated = state.services.shipments.dispatch(id).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/deliver",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment marked as delivered", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn deliver_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    let updated = state.services.shipments.mark_delivered(id).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/cancel",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment cancelled", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn cancel_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    let updated = state.services.shipments.cancel(id).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/track/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Tracking number")),
    responses(
        (status = 200, description = "Shipment fetched by tracking number", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn track_by_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> ApiResult<ShipmentSummary> {
    match state
        .services
        .shipments
        .find_by_tracking_number(&tracking_number)
        .await?
    {
        Some(model) => Ok(Json(ApiResponse::success(ShipmentSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Shipment with tracking number {} not found",
            tracking_number
        ))),
    }
}
