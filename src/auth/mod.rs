/*!
 * # Authentication and Authorization Module
 *
 * Supports credential login (argon2id password hashes), Google sign-in
 * (verified ID tokens), and JWT access/refresh token pairs with rotation.
 * Role-based permissions gate the REST routes through `AuthRouterExt`.
 */

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

// Entity modules
pub mod refresh_token;
pub mod user;

// Feature modules
pub mod oauth2;
mod permissions;

// Re-exports
pub use permissions::{consts, role_permissions};
pub use user::UserRole;

/// Convenience alias used throughout the services
pub type User = user::Model;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Subject (user ID)
    pub name: Option<String>,     // User's name
    pub email: Option<String>,    // User's email
    pub role: String,             // User's role
    pub permissions: Vec<String>, // Role-derived permissions
    pub jti: String,              // JWT ID (unique identifier for this token)
    pub token_use: String,        // "access" or "refresh"
    pub iat: i64,                 // Issued at time
    pub exp: i64,                 // Expiration time
    pub nbf: i64,                 // Not valid before time
    pub iss: String,              // Issuer
    pub aud: String,              // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    /// Check if the user has a specific permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Check if the user is an admin
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn user_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.user_id).ok()
    }
}

/// Token pair returned by login, register, and refresh operations
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
        refresh_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
            refresh_token_expiration,
        }
    }

    pub fn from_app_config(cfg: &crate::config::AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
            Duration::from_secs(cfg.refresh_token_expiration as u64),
        )
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    InactiveUser,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User not found")]
    UserNotFound,

    #[error("OAuth verification failed: {0}")]
    OAuthVerification(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message) = match &self {
            Self::MissingAuth | Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                self.to_string(),
            ),
            Self::InvalidToken | Self::TokenExpired | Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                self.to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                self.to_string(),
            ),
            Self::InactiveUser => (
                StatusCode::FORBIDDEN,
                "AUTH_INACTIVE_USER",
                self.to_string(),
            ),
            Self::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_PERMISSIONS",
                self.to_string(),
            ),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "AUTH_USER_NOT_FOUND", self.to_string()),
            Self::OAuthVerification(_) => (
                StatusCode::UNAUTHORIZED,
                "AUTH_OAUTH_FAILED",
                self.to_string(),
            ),
            Self::TokenCreation(_) | Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal authentication error".to_string(),
            ),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_DATABASE_ERROR",
                "Internal authentication error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for crate::errors::ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions | AuthError::InactiveUser => {
                crate::errors::ServiceError::Forbidden(err.to_string())
            }
            AuthError::DatabaseError(msg) | AuthError::InternalError(msg) => {
                crate::errors::ServiceError::InternalError(msg)
            }
            other => crate::errors::ServiceError::AuthError(other.to_string()),
        }
    }
}

/// Hash a password with argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::InternalError(format!("Stored hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Token blacklist entry
#[derive(Clone, Debug)]
struct BlacklistedToken {
    jti: String,
    expiry: DateTime<Utc>,
}

/// Authentication service that handles token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
    blacklisted_tokens: Arc<RwLock<Vec<BlacklistedToken>>>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self {
            config,
            db,
            blacklisted_tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Generate an access/refresh token pair for a user
    pub async fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;
        let refresh_exp = now
            + ChronoDuration::from_std(self.config.refresh_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let access_jti = Uuid::new_v4().to_string();
        let refresh_jti = Uuid::new_v4().to_string();

        let permissions = role_permissions(user.role);

        let access_claims = Claims {
            sub: user.id.to_string(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            role: user.role.to_string(),
            permissions,
            jti: access_jti,
            token_use: "access".to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        // Refresh tokens carry minimal data
        let refresh_claims = Claims {
            sub: user.id.to_string(),
            name: None,
            email: None,
            role: user.role.to_string(),
            permissions: vec![],
            jti: refresh_jti.clone(),
            token_use: "refresh".to_string(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let access_token = encode_claims(&access_claims, &self.config.jwt_secret)?;
        let refresh_token = encode_claims(&refresh_claims, &self.config.jwt_secret)?;

        self.store_refresh_token(user.id, &refresh_jti, refresh_exp)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            refresh_expires_in: self.config.refresh_token_expiration.as_secs() as i64,
        })
    }

    /// Validate a JWT token and extract the claims
    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode_claims(
            token,
            &self.config.jwt_secret,
            &self.config.jwt_issuer,
            &self.config.jwt_audience,
        )?;

        if self.is_token_blacklisted(&claims.jti).await {
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Build the authenticated user view from a validated access token
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.validate_token(token).await?;
        if claims.token_use != "access" {
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthUser {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            permissions: claims.permissions,
            token_id: claims.jti,
        })
    }

    /// Rotate a refresh token: verify, revoke the old jti, issue a new pair
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token).await?;
        if claims.token_use != "refresh" {
            return Err(AuthError::InvalidToken);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let valid = self.verify_refresh_token(user_id, &claims.jti).await?;
        if !valid {
            return Err(AuthError::InvalidToken);
        }

        let user = self.get_user(user_id).await?;
        if !user.active {
            return Err(AuthError::InactiveUser);
        }

        let new_tokens = self.generate_token_pair(&user).await?;

        self.revoke_refresh_token(user_id, &claims.jti).await?;

        Ok(new_tokens)
    }

    /// Revoke a token (add its jti to the blacklist until expiry)
    pub async fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.validate_token(token).await?;
        let expiry = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .unwrap_or_else(|| Utc::now() + ChronoDuration::hours(1));

        let mut blacklist = self.blacklisted_tokens.write().await;
        let now = Utc::now();
        blacklist.retain(|entry| entry.expiry > now);
        blacklist.push(BlacklistedToken {
            jti: claims.jti.clone(),
            expiry,
        });

        // Refresh tokens also get their DB record revoked
        if claims.token_use == "refresh" {
            if let Ok(user_id) = Uuid::parse_str(&claims.sub) {
                self.revoke_refresh_token(user_id, &claims.jti).await?;
            }
        }

        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> bool {
        let blacklist = self.blacklisted_tokens.read().await;
        let now = Utc::now();
        blacklist
            .iter()
            .any(|entry| entry.jti == jti && entry.expiry > now)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)
    }

    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let record = refresh_token::ActiveModel {
            user_id: Set(user_id),
            jti: Set(jti.to_string()),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        record
            .insert(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn verify_refresh_token(&self, user_id: Uuid, jti: &str) -> Result<bool, AuthError> {
        let found = refresh_token::Entity::find()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .filter(refresh_token::Column::Jti.eq(jti))
            .filter(refresh_token::Column::Revoked.eq(false))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(found
            .map(|record| record.expires_at > Utc::now())
            .unwrap_or(false))
    }

    async fn revoke_refresh_token(&self, user_id: Uuid, jti: &str) -> Result<(), AuthError> {
        let found = refresh_token::Entity::find()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .filter(refresh_token::Column::Jti.eq(jti))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if let Some(record) = found {
            let mut active: refresh_token::ActiveModel = record.into();
            active.revoked = Set(true);
            active
                .update(&*self.db)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

fn decode_claims(
    token: &str,
    secret: &str,
    issuer: &str,
    audience: &str,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// Extract authentication info from request headers
async fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if auth_value.starts_with("Bearer ") {
                let token = auth_value.trim_start_matches("Bearer ").trim();
                return auth_service.authenticate(token).await;
            }
        }
    }

    Err(AuthError::MissingAuth)
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service).await {
        Ok(user) => {
            debug!(user_id = %user.user_id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Permission middleware to check if a user has the required permission
pub async fn permission_middleware(
    State(required_permission): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user.clone(),
        None => return Err(AuthError::MissingAuth),
    };

    // Admins have all permissions
    if user.is_admin() {
        return Ok(next.run(request).await);
    }

    if !user.has_permission(&required_permission) {
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, permission: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, permission: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            permission.to_string(),
            permission_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_claims(token_use: &str, exp_offset_secs: i64) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4().to_string(),
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
            role: "manager".into(),
            permissions: role_permissions(UserRole::Manager),
            jti: Uuid::new_v4().to_string(),
            token_use: token_use.into(),
            iat: now.timestamp(),
            exp: now.timestamp() + exp_offset_secs,
            nbf: now.timestamp(),
            iss: "assettrack-api".into(),
            aud: "assettrack-clients".into(),
        }
    }

    const SECRET: &str = "unit-test-secret-key-that-is-long-enough-for-hs256-signing-0001";

    #[test]
    fn token_round_trip() {
        let claims = test_claims("access", 3600);
        let token = encode_claims(&claims, SECRET).unwrap();
        let decoded =
            decode_claims(&token, SECRET, "assettrack-api", "assettrack-clients").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.token_use, "access");
        assert!(decoded
            .permissions
            .contains(&consts::ASSIGNMENTS_CREATE.to_string()));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let claims = test_claims("access", 3600);
        let token = encode_claims(&claims, SECRET).unwrap();
        let result = decode_claims(&token, SECRET, "assettrack-api", "someone-else");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = test_claims("access", -3600);
        let token = encode_claims(&claims, SECRET).unwrap();
        let result = decode_claims(&token, SECRET, "assettrack-api", "assettrack-clients");
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }
}
