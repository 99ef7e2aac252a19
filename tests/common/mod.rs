use std::sync::Arc;

use assettrack_api as api;

use api::{
    auth::{self, user, AuthConfig, AuthService, UserRole},
    config::AppConfig,
    db,
    events::EventSender,
    handlers::AppServices,
    AppState,
};
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_JWT_SECRET: &str =
    "integration-test-secret-key-with-plenty-of-entropy-0123456789-abcdefgh";

/// Helper harness spinning up the full router over an in-memory SQLite
/// database. Each TestApp owns its own database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
    viewer_token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.cors_allow_any_origin = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let db_cfg: db::DbConfig = (&cfg).into();
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("test database");
        db::run_migrations(&pool).await.expect("migrations");
        let db_arc = Arc::new(pool);

        // Events are drained so senders never block
        let (event_tx, mut event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(async move { while event_rx.recv().await.is_some() {} });
        let event_sender = EventSender::new(event_tx);

        let auth_config = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
            Duration::from_secs(cfg.refresh_token_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_config, db_arc.clone()));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc.clone(),
            config: cfg,
            event_sender,
            services,
            auth_service: auth_service.clone(),
            google_verifier: None,
            google_oauth: None,
        };

        let admin = seed_user(&state, "admin@test.local", UserRole::Admin).await;
        let viewer = seed_user(&state, "viewer@test.local", UserRole::Viewer).await;

        let admin_token = auth_service
            .generate_token_pair(&admin)
            .await
            .expect("admin token")
            .access_token;
        let viewer_token = auth_service
            .generate_token_pair(&viewer)
            .await
            .expect("viewer token")
            .access_token;

        let router = Router::new()
            .nest(
                "/api",
                api::api_auth_routes().nest("/v1", api::api_v1_routes()),
            )
            .merge(api::graphql::routes(&state))
            .layer(axum::middleware::from_fn_with_state(
                auth_service,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: axum::http::Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .layer(axum::middleware::from_fn(
                api::middleware_helpers::request_id::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_token,
            viewer_token,
            _event_task: event_task,
        }
    }

    /// Send an unauthenticated request
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.send(method, uri, body, None).await
    }

    /// Send a request with the seeded admin's bearer token
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.send(method, uri, body, Some(self.admin_token.clone()))
            .await
    }

    /// Send a request with an arbitrary bearer token
    pub async fn request_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: &str,
    ) -> Response {
        self.send(method, uri, body, Some(token.to_string())).await
    }

    /// Send a request with the seeded read-only viewer's bearer token
    pub async fn request_as_viewer(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.send(method, uri, body, Some(self.viewer_token.clone()))
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<String>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request body"),
            None => builder.body(Body::empty()).expect("request"),
        };

        self.router.clone().oneshot(request).await.expect("response")
    }
}

async fn seed_user(state: &AppState, email: &str, role: UserRole) -> auth::User {
    let record = user::ActiveModel {
        name: Set(format!("Test {}", role)),
        email: Set(email.to_string()),
        password_hash: Set(auth::hash_password("test-password-123").expect("hash")),
        role: Set(role),
        ..Default::default()
    };
    record.insert(&*state.db).await.expect("seed user")
}

/// Parse a response body as JSON
pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Seed an available asset through the service layer
pub async fn seed_asset(app: &TestApp, tag: &str) -> Uuid {
    use api::entities::asset::AssetCategory;
    use api::services::assets::CreateAssetInput;

    let created = app
        .state
        .services
        .assets
        .create_asset(CreateAssetInput {
            asset_tag: tag.to_string(),
            name: format!("Test asset {}", tag),
            description: None,
            category: AssetCategory::Laptop,
            serial_number: None,
            location: Some("Test lab".into()),
            purchase_date: None,
            purchase_price: None,
            warranty_until: None,
            notes: None,
        })
        .await
        .expect("seed asset");
    created.id
}

/// Seed an active holder through the service layer
pub async fn seed_holder(app: &TestApp, email: &str) -> Uuid {
    use api::services::asset_holders::CreateHolderInput;

    let created = app
        .state
        .services
        .holders
        .create_holder(CreateHolderInput {
            name: "Test Holder".into(),
            email: email.to_string(),
            department: Some("QA".into()),
            phone: None,
        })
        .await
        .expect("seed holder");
    created.id
}
