use crate::{
    entities::asset_holder,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::asset_holders::{CreateHolderInput, UpdateHolderInput},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolderListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// When true (default), deactivated holders are hidden
    pub active_only: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HolderSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<asset_holder::Model> for HolderSummary {
    fn from(model: asset_holder::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            department: model.department,
            phone: model.phone,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHolderRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub department: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHolderRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub department: Option<String>,
    pub phone: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/asset-holders",
    params(HolderListQuery),
    responses(
        (status = 200, description = "Holders listed", body = ApiResponse<PaginatedResponse<HolderSummary>>)
    ),
    tag = "asset-holders"
)]
pub async fn list_holders(
    State(state): State<AppState>,
    Query(query): Query<HolderListQuery>,
) -> ApiResult<PaginatedResponse<HolderSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);
    let active_only = query.active_only.unwrap_or(true);

    let (records, total) = state
        .services
        .holders
        .list_holders(page, limit, active_only, query.search)
        .await?;

    let items: Vec<HolderSummary> = records.into_iter().map(HolderSummary::from).collect();
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
    path = "/api/v1/asset-holders/{id}",
    params(("id" = Uuid, Path, description = "Holder ID")),
    responses(
        (status = 200, description = "Holder fetched", body = ApiResponse<HolderSummary>),
        (status = 404, description = "Holder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-holders"
)]
pub async fn get_holder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<HolderSummary> {
    match state.services.holders.get_holder(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(HolderSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Holder {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/asset-holders",
    request_body = CreateHolderRequest,
    responses(
        (status = 201, description = "Holder created", body = ApiResponse<HolderSummary>),
        (status = 409, description = "Duplicate email", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-holders"
)]
pub async fn create_holder(
    State(state): State<AppState>,
    Json(payload): Json<CreateHolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HolderSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .services
        .holders
        .create_holder(CreateHolderInput {
            name: payload.name,
            email: payload.email,
            department: payload.department,
            phone: payload.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(HolderSummary::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/asset-holders/{id}",
    params(("id" = Uuid, Path, description = "Holder ID")),
    request_body = UpdateHolderRequest,
    responses(
        (status = 200, description = "Holder updated", body = ApiResponse<HolderSummary>),
        (status = 404, description = "Holder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-holders"
)]
pub async fn update_holder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHolderRequest>,
) -> ApiResult<HolderSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let updated = state
        .services
        .holders
        .update_holder(
            id,
            UpdateHolderInput {
                name: payload.name,
                department: payload.department,
                phone: payload.phone,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(HolderSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/asset-holders/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Holder ID")),
    responses(
        (status = 200, description = "Holder deactivated", body = ApiResponse<HolderSummary>),
        (status = 404, description = "Holder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-holders"
)]
pub async fn deactivate_holder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<HolderSummary> {
    let updated = state.services.holders.deactivate_holder(id).await?;
    Ok(Json(ApiResponse::success(HolderSummary::from(updated))))
}
