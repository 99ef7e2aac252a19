use crate::{
    auth::{AuthUser, TokenPair},
    errors::ServiceError,
    services::users::RegisterUserInput,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "email": "jane@example.com", "password": "hunter2hunter2" }))]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GoogleLoginRequest {
    /// ID token obtained from Google Identity Services on the client
    #[validate(length(min = 1))]
    pub id_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "viewer")]
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<crate::auth::User> for UserSummary {
    fn from(model: crate::auth::User) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role.to_string(),
            last_login_at: model.last_login_at,
        }
    }
}

/// Token pair plus the account it belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

impl AuthResponse {
    fn new(tokens: TokenPair, user: crate::auth::User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: UserSummary::from(user),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthResponse>),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let user = state
        .services
        .users
        .register(RegisterUserInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let tokens = state.auth_service.generate_token_pair(&user).await?;
    state.services.users.record_login(user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse::new(tokens, user))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let user = state
        .services
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    let tokens = state.auth_service.generate_token_pair(&user).await?;
    state.services.users.record_login(user.id).await?;

    Ok(Json(ApiResponse::success(AuthResponse::new(tokens, user))))
}

#[utoipa::path(
    post,
    path = "/api/google-login",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Logged in via Google", body = ApiResponse<AuthResponse>),
        (status = 401, description = "ID token rejected", body = crate::errors::ErrorResponse),
        (status = 503, description = "Google sign-in not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_login(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> ApiResult<AuthResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let verifier = state.google_verifier.as_ref().ok_or_else(|| {
        ServiceError::InvalidOperation("Google sign-in is not enabled on this server".into())
    })?;

    let profile = verifier.verify_id_token(&payload.id_token).await?;

    let user = state
        .services
        .users
        .find_or_create_google_user(&profile)
        .await?;

    let tokens = state.auth_service.generate_token_pair(&user).await?;
    state.services.users.record_login(user.id).await?;

    Ok(Json(ApiResponse::success(AuthResponse::new(tokens, user))))
}

#[utoipa::path(
    get,
    path = "/api/google-login",
    responses(
        (status = 200, description = "Consent URL for the redirect flow", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Google sign-in not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_login_url(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let config = state.google_oauth.as_ref().ok_or_else(|| {
        ServiceError::InvalidOperation("Google sign-in is not enabled on this server".into())
    })?;

    let (url, csrf) = config.authorize_url()?;

    Ok(Json(ApiResponse::success(json!({
        "authorize_url": url.to_string(),
        "state": csrf.secret(),
    }))))
}

#[utoipa::path(
    post,
    path = "/api/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Refresh token rejected", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<serde_json::Value> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let tokens = state
        .auth_service
        .refresh_token(&payload.refresh_token)
        .await?;

    Ok(Json(ApiResponse::success(json!({
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "token_type": tokens.token_type,
        "expires_in": tokens.expires_in,
    }))))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserSummary>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserSummary> {
    let user_id = auth_user
        .user_uuid()
        .ok_or_else(|| ServiceError::AuthError("Malformed token subject".into()))?;

    match state.services.users.get_user(user_id).await? {
        Some(user) => Ok(Json(ApiResponse::success(UserSummary::from(user)))),
        None => Err(ServiceError::NotFound("Account no longer exists".into())),
    }
}
