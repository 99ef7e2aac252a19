use crate::{
    entities::assignment,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::assignments::{AssignAssetInput, AssignmentFilter},
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
pub struct AssignmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub asset_id: Option<Uuid>,
    pub holder_id: Option<Uuid>,
    /// active, returned, or overdue
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentSummary {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub holder_id: Uuid,
    #[schema(example = "Active")]
    pub status: String,
    pub assigned_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub condition_out: Option<String>,
    pub condition_in: Option<String>,
    pub notes: Option<String>,
}

impl From<assignment::Model> for AssignmentSummary {
    fn from(model: assignment::Model) -> Self {
        Self {
            id: model.id,
            asset_id: model.asset_id,
            holder_id: model.holder_id,
            status: model.status.to_string(),
            assigned_at: model.assigned_at,
            due_at: model.due_at,
            returned_at: model.returned_at,
            condition_out: model.condition_out,
            condition_in: model.condition_in,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "asset_id": "990e8400-e29b-41d4-a716-446655440000",
    "holder_id": "550e8400-e29b-41d4-a716-446655440000",
    "due_at": "2025-09-01T00:00:00Z",
    "condition_out": "New, sealed box"
}))]
pub struct CreateAssignmentRequest {
    pub asset_id: Uuid,
    pub holder_id: Uuid,
    pub due_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub condition_out: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema, Default)]
pub struct ReturnAssignmentRequest {
    #[validate(length(max = 500))]
    pub condition_in: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    params(AssignmentListQuery),
    responses(
        (status = 200, description = "Assignments listed", body = ApiResponse<PaginatedResponse<AssignmentSummary>>)
    ),
    tag = "assignments"
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentListQuery>,
) -> ApiResult<PaginatedResponse<AssignmentSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let filter = AssignmentFilter {
        asset_id: query.asset_id,
        holder_id: query.holder_id,
        status: query.status,
    };

    let (records, total) = state
        .services
        .assignments
        .list_assignments(page, limit, filter)
        .await?;

    let items: Vec<AssignmentSummary> = records.into_iter().map(AssignmentSummary::from).collect();
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
    path = "/api/v1/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment fetched", body = ApiResponse<AssignmentSummary>),
        (status = 404, description = "Assignment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AssignmentSummary> {
    match state.services.assignments.get_assignment(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(AssignmentSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Assignment {} not found",
            id
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Asset assigned", body = ApiResponse<AssignmentSummary>),
        (status = 400, description = "Asset not assignable", body = crate::errors::ErrorResponse),
        (status = 409, description = "Open assignment already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .services
        .assignments
        .assign_asset(AssignAssetInput {
            asset_id: payload.asset_id,
            holder_id: payload.holder_id,
            due_at: payload.due_at,
            condition_out: payload.condition_out,
            notes: payload.notes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AssignmentSummary::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/return",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = ReturnAssignmentRequest,
    responses(
        (status = 200, description = "Assignment closed", body = ApiResponse<AssignmentSummary>),
        (status = 400, description = "Assignment not open", body = crate::errors::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn return_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ReturnAssignmentRequest>>,
) -> ApiResult<AssignmentSummary> {
    let condition_in = payload.and_then(|Json(p)| p.condition_in);

    let updated = state
        .services
        .assignments
        .mark_returned(id, condition_in)
        .await?;

    Ok(Json(ApiResponse::success(AssignmentSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/sweep-overdue",
    responses(
        (status = 200, description = "Past-due assignments flagged", body = ApiResponse<serde_json::Value>)
    ),
    tag = "assignments"
)]
pub async fn sweep_overdue(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let flagged = state.services.assignments.sweep_overdue().await?;
    Ok(Json(ApiResponse::success(json!({ "flagged": flagged }))))
}
