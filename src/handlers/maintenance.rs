use crate::{
    entities::maintenance_log,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::maintenance::{MaintenanceFilter, ScheduleMaintenanceInput},
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
pub struct MaintenanceListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub asset_id: Option<Uuid>,
    /// scheduled, in_progress, completed, or canceled
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceLogSummary {
    pub id: Uuid,
    pub asset_id: Uuid,
    #[schema(example = "Repair")]
    pub maintenance_type: String,
    #[schema(example = "Scheduled")]
    pub status: String,
    pub description: String,
    pub performed_by: Option<String>,
    pub cost: Option<Decimal>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<maintenance_log::Model> for MaintenanceLogSummary {
    fn from(model: maintenance_log::Model) -> Self {
        Self {
            id: model.id,
            asset_id: model.asset_id,
            maintenance_type: model.maintenance_type.to_string(),
            status: model.status.to_string(),
            description: model.description,
            performed_by: model.performed_by,
            cost: model.cost,
            scheduled_for: model.scheduled_for,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleMaintenanceRequest {
    pub asset_id: Uuid,
    /// preventive, repair, inspection, or calibration
    #[validate(length(min = 1))]
    pub maintenance_type: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub performed_by: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema, Default)]
pub struct CompleteMaintenanceRequest {
    pub cost: Option<Decimal>,
    pub performed_by: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/maintenance-logs",
    params(MaintenanceListQuery),
    responses(
        (status = 200, description = "Maintenance logs listed", body = ApiResponse<PaginatedResponse<MaintenanceLogSummary>>)
    ),
    tag = "maintenance"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<MaintenanceListQuery>,
) -> ApiResult<PaginatedResponse<MaintenanceLogSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let filter = MaintenanceFilter {
        asset_id: query.asset_id,
        status: query.status,
    };

    let (records, total) = state
        .services
        .maintenance
        .list_logs(page, limit, filter)
        .await?;

    let items: Vec<MaintenanceLogSummary> = records
        .into_iter()
        .map(MaintenanceLogSummary::from)
        .collect();
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
    path = "/api/v1/maintenance-logs/{id}",
    params(("id" = Uuid, Path, description = "Maintenance log ID")),
    responses(
        (status = 200, description = "Maintenance log fetched", body = ApiResponse<MaintenanceLogSummary>),
        (status = 404, description = "Log not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<MaintenanceLogSummary> {
    match state.services.maintenance.get_log(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(MaintenanceLogSummary::from(
            model,
        )))),
        None => Err(ServiceError::NotFound(format!(
            "Maintenance log {} not found",
            id
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-logs",
    request_body = ScheduleMaintenanceRequest,
    responses(
        (status = 201, description = "Maintenance scheduled", body = ApiResponse<MaintenanceLogSummary>),
        (status = 400, description = "Asset not eligible for maintenance", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn schedule_maintenance(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceLogSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let maintenance_type = payload
        .maintenance_type
        .parse::<maintenance_log::MaintenanceType>()
        .map_err(ServiceError::ValidationError)?;

    let created = state
        .services
        .maintenance
        .schedule(ScheduleMaintenanceInput {
            asset_id: payload.asset_id,
            maintenance_type,
            description: payload.description,
            performed_by: payload.performed_by,
            scheduled_for: payload.scheduled_for,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MaintenanceLogSummary::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-logs/{id}/start",
    params(("id" = Uuid, Path, description = "Maintenance log ID")),
    responses(
        (status = 200, description = "Maintenance started", body = ApiResponse<MaintenanceLogSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn start_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<MaintenanceLogSummary> {
    let updated = state.services.maintenance.start(id).await?;
    Ok(Json(ApiResponse::success(MaintenanceLogSummary::from(
        updated,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-logs/{id}/complete",
    params(("id" = Uuid, Path, description = "Maintenance log ID")),
    request_body = CompleteMaintenanceRequest,
    responses(
        (status = 200, description = "Maintenance completed", body = ApiResponse<MaintenanceLogSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteMaintenanceRequest>>,
) -> ApiResult<MaintenanceLogSummary> {
    let (cost, performed_by) = payload
        .map(|Json(p)| (p.cost, p.performed_by))
        .unwrap_or_default();

    let updated = state
        .services
        .maintenance
        .complete(id, cost, performed_by)
        .await?;

    Ok(Json(ApiResponse::success(MaintenanceLogSummary::from(
        updated,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-logs/{id}/cancel",
    params(("id" = Uuid, Path, description = "Maintenance log ID")),
    responses(
        (status = 200, description = "Maintenance canceled", body = ApiResponse<MaintenanceLogSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn cancel_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<MaintenanceLogSummary> {
    let updated = state.services.maintenance.cancel(id).await?;
    Ok(Json(ApiResponse::success(MaintenanceLogSummary::from(
        updated,
    ))))
}
