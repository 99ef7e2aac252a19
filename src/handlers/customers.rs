use crate::{
    entities::customer,
    errors::ServiceError,
    handlers::common::clamp_pagination,
    services::customers::{CreateCustomerInput, UpdateCustomerInput},
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
pub struct CustomerListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<customer::Model> for CustomerSummary {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(CustomerListQuery),
    responses(
        (status = 200, description = "Customers listed", body = ApiResponse<PaginatedResponse<CustomerSummary>>)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<PaginatedResponse<CustomerSummary>> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let (records, total) = state
        .services
        .customers
        .list_customers(page, limit, query.search)
        .await?;

    let items: Vec<CustomerSummary> = records.into_iter().map(CustomerSummary::from).collect();
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
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer fetched", body = ApiResponse<CustomerSummary>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<CustomerSummary> {
    match state.services.customers.get_customer(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(CustomerSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Customer {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerSummary>),
        (status = 409, description = "Duplicate email", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerSummary>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .services
        .customers
        .create_customer(CreateCustomerInput {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CustomerSummary::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerSummary>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> ApiResult<CustomerSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let updated = state
        .services
        .customers
        .update_customer(
            id,
            UpdateCustomerInput {
                name: payload.name,
                phone: payload.phone,
                address: payload.address,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(CustomerSummary::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.services.customers.delete_customer(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
