use crate::{
    entities::return_request,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::returns::SubmitReturnInput,
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
pub struct ReturnListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// requested, approved, rejected, or completed
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnRequestSummary {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub requested_by: String,
    pub reason: String,
    #[schema(example = "Requested")]
    pub status: String,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<return_request::Model> for ReturnRequestSummary {
    fn from(model: return_request::Model) -> Self {
        Self {
            id: model.id,
            assignment_id: model.assignment_id,
            requested_by: model.requested_by,
            reason: model.reason,
            status: model.status.to_string(),
            resolution_notes: model.resolution_notes,
            resolved_at: model.resolved_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitReturnRequest {
    pub assignment_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub requested_by: String,
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema, Default)]
pub struct ResolveReturnRequest {
    #[validate(length(max = 2000))]
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema, Default)]
pub struct CompleteReturnRequest {
    #[validate(length(max = 500))]
    pub condition_in: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/return-requests",
    params(ReturnListQuery),
    responses(
        (status = 200, description = "Return requests listed", body = ApiResponse<PaginatedResponse<ReturnRequestSummary>>)
    ),
    tag = "returns"
)]
pub async fn list_returns(
    State(state): State<AppState>,
    Query(query): Query<ReturnListQuery>,
) -> ApiResult<PaginatedResponse<ReturnRequestSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let (records, total) = state
        .services
        .returns
        .list_requests(page, limit, query.status)
        .await?;

    let items: Vec<ReturnRequestSummary> = records
        .into_iter()
        .map(ReturnRequestSummary::from)
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
    path = "/api/v1/return-requests/{id}",
    params(("id" = Uuid, Path, description = "Return request ID")),
    responses(
        (status = 200, description = "Return request fetched", body = ApiResponse<ReturnRequestSummary>),
        (status = 404, description = "Return request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn get_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ReturnRequestSummary> {
    match state.services.returns.get_request(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ReturnRequestSummary::from(
            model,
        )))),
        None => Err(ServiceError::NotFound(format!(
            "Return request {} not found",
            id
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/return-requests",
    request_body = SubmitReturnRequest,
    responses(
        (status = 201, description = "Return requested", body = ApiResponse<ReturnRequestSummary>),
        (status = 400, description = "Assignment not open", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request already open", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn submit_return(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReturnRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReturnRequestSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .services
        .returns
        .submit(SubmitReturnInput {
            assignment_id: payload.assignment_id,
            requested_by: payload.requested_by,
            reason: payload.reason,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReturnRequestSummary::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/return-requests/{id}/approve",
    params(("id" = Uuid, Path, description = "Return request ID")),
    request_body = ResolveReturnRequest,
    responses(
        (status = 200, description = "Return approved", body = ApiResponse<ReturnRequestSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn approve_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ResolveReturnRequest>>,
) -> ApiResult<ReturnRequestSummary> {
    let notes = payload.and_then(|Json(p)| p.resolution_notes);
    let updated = state.services.returns.approve(id, notes).await?;
    Ok(Json(ApiResponse::success(ReturnRequestSummary::from(
        updated,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/return-requests/{id}/reject",
    params(("id" = Uuid, Path, description = "Return request ID")),
    request_body = ResolveReturnRequest,
    responses(
        (status = 200, description = "Return rejected", body = ApiResponse<ReturnRequestSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn reject_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ResolveReturnRequest>>,
) -> ApiResult<ReturnRequestSummary> {
    let notes = payload.and_then(|Json(p)| p.resolution_notes);
    let updated = state.services.returns.reject(id, notes).await?;
    Ok(Json(ApiResponse::success(ReturnRequestSummary::from(
        updated,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/return-requests/{id}/complete",
    params(("id" = Uuid, Path, description = "Return request ID")),
    request_body = CompleteReturnRequest,
    responses(
        (status = 200, description = "Return completed; assignment closed", body = ApiResponse<ReturnRequestSummary>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn complete_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteReturnRequest>>,
) -> ApiResult<ReturnRequestSummary> {
    let condition_in = payload.and_then(|Json(p)| p.condition_in);
    let updated = state.services.returns.complete(id, condition_in).await?;
    Ok(Json(ApiResponse::success(ReturnRequestSummary::from(
        updated,
    ))))
}
