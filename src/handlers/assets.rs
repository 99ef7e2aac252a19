use crate::{
    entities::asset,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::assets::{AssetFilter, CreateAssetInput, UpdateAssetInput},
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
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssetListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "990e8400-e29b-41d4-a716-446655440000",
    "asset_tag": "IT-0042",
    "name": "MacBook Pro 14\"",
    "category": "Laptop",
    "status": "Available",
    "location": "Seattle HQ / Floor 3",
    "serial_number": "C02XL0GZJHD3",
    "created_at": "2025-06-09T10:30:00Z",
    "updated_at": "2025-06-09T10:30:00Z"
}))]
pub struct AssetSummary {
    /// Asset UUID
    pub id: Uuid,
    /// Organization-wide tag on the physical label
    #[schema(example = "IT-0042")]
    pub asset_tag: String,
    pub name: String,
    pub description: Option<String>,
    /// Category (laptop, monitor, phone, tablet, vehicle, tool, furniture, other)
    #[schema(example = "Laptop")]
    pub category: String,
    pub serial_number: Option<String>,
    /// Lifecycle status (available, assigned, in_maintenance, in_transit, retired)
    #[schema(example = "Available")]
    pub status: String,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<Decimal>,
    pub warranty_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<asset::Model> for AssetSummary {
    fn from(model: asset::Model) -> Self {
        Self {
            id: model.id,
            asset_tag: model.asset_tag,
            name: model.name,
            description: model.description,
            category: model.category.to_string(),
            serial_number: model.serial_number,
            status: model.status.to_string(),
            location: model.location,
            purchase_date: model.purchase_date,
            purchase_price: model.purchase_price,
            warranty_until: model.warranty_until,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "asset_tag": "IT-0042",
    "name": "MacBook Pro 14\"",
    "category": "laptop",
    "serial_number": "C02XL0GZJHD3",
    "location": "Seattle HQ / Floor 3"
}))]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 64))]
    pub asset_tag: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Category (laptop, monitor, phone, tablet, vehicle, tool, furniture, other)
    #[validate(length(min = 1))]
    pub category: String,
    pub serial_number: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<Decimal>,
    pub warranty_until: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub serial_number: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub warranty_until: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/assets",
    params(AssetListQuery),
    responses(
        (status = 200, description = "Assets listed", body = ApiResponse<PaginatedResponse<AssetSummary>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<AssetListQuery>,
) -> ApiResult<PaginatedResponse<AssetSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let filter = AssetFilter {
        status: query.status,
        category: query.category,
        search: query.search,
    };

    let (records, total) = state.services.assets.list_assets(page, limit, filter).await?;

    let items: Vec<AssetSummary> = records.into_iter().map(AssetSummary::from).collect();
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
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset fetched", body = ApiResponse<AssetSummary>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AssetSummary> {
    match state.services.assets.get_asset(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(AssetSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Asset {} not found", id))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/by-tag/{tag}",
    params(("tag" = String, Path, description = "Asset tag")),
    responses(
        (status = 200, description = "Asset fetched by tag", body = ApiResponse<AssetSummary>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn get_asset_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> ApiResult<AssetSummary> {
    match state.services.assets.get_asset_by_tag(&tag).await? {
        Some(model) => Ok(Json(ApiResponse::success(AssetSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Asset with tag '{}' not found",
            tag
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/assets",
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset created", body = ApiResponse<AssetSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate asset tag", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssetSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let category = payload
        .category
        .parse::<asset::AssetCategory>()
        .map_err(ServiceError::ValidationError)?;

    let input = CreateAssetInput {
        asset_tag: payload.asset_tag,
        name: payload.name,
        description: payload.description,
        category,
        serial_number: payload.serial_number,
        location: payload.location,
        purchase_date: payload.purchase_date,
        purchase_price: payload.purchase_price,
        warranty_until: payload.warranty_until,
        notes: payload.notes,
    };

    let created = state.services.assets.create_asset(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AssetSummary::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = UpdateAssetRequest,
    responses(
        (status = 200, description = "Asset updated", body = ApiResponse<AssetSummary>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssetRequest>,
) -> ApiResult<AssetSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let input = UpdateAssetInput {
        name: payload.name,
        description: payload.description,
        serial_number: payload.serial_number,
        location: payload.location,
        notes: payload.notes,
        warranty_until: payload.warranty_until,
    };

    let updated = state.services.assets.update_asset(id, input).await?;
    Ok(Json(ApiResponse::success(AssetSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/{id}/retire",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset retired", body = ApiResponse<AssetSummary>),
        (status = 400, description = "Asset cannot be retired in its current state", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn retire_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AssetSummary> {
    let updated = state.services.assets.retire_asset(id).await?;
    Ok(Json(ApiResponse::success(AssetSummary::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset deleted", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Asset has history and cannot be deleted", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.services.assets.delete_asset(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
