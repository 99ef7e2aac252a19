use crate::{
    auth::{self, oauth2::GoogleProfile, user, UserRole},
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for registering a user account
#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Service for account management and credential checks
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new account with a hashed password.
    /// New accounts default to the viewer role; admins promote them later.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterUserInput) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        if input.password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 8 characters".into(),
            ));
        }

        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::ValidationError("Invalid email".into()));
        }

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "An account with email '{}' already exists",
                email
            )));
        }

        let password_hash = auth::hash_password(&input.password)?;

        let record = user::ActiveModel {
            name: Set(input.name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(UserRole::Viewer),
            ..Default::default()
        };
        let created = record.insert(db).await?;

        info!(user_id = %created.id, "User registered");
        self.event_sender
            .send_logged(Event::UserRegistered(created.id))
            .await;

        Ok(created)
    }

    /// Verifies credentials and returns the account.
    /// The same error covers unknown email and wrong password.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let account = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Invalid email or password".into()))?;

        if !auth::verify_password(password, &account.password_hash)? {
            return Err(ServiceError::AuthError("Invalid email or password".into()));
        }

        if !account.active {
            return Err(ServiceError::Forbidden("Account is inactive".into()));
        }

        Ok(account)
    }

    /// Finds the account matching a verified Google profile, creating one on
    /// first sign-in. Google accounts have no usable local password.
    #[instrument(skip(self, profile))]
    pub async fn find_or_create_google_user(
        &self,
        profile: &GoogleProfile,
    ) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let email = profile.email.trim().to_lowercase();

        if let Some(existing) = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(db)
            .await?
        {
            if !existing.active {
                return Err(ServiceError::Forbidden("Account is inactive".into()));
            }
            return Ok(existing);
        }

        // A random password hash keeps the column non-null while making
        // credential login impossible for this account.
        let placeholder = auth::hash_password(&Uuid::new_v4().to_string())?;

        let record = user::ActiveModel {
            name: Set(profile
                .name
                .clone()
                .unwrap_or_else(|| email.clone())),
            email: Set(email),
            password_hash: Set(placeholder),
            role: Set(UserRole::Viewer),
            ..Default::default()
        };
        let created = record.insert(db).await?;

        info!(user_id = %created.id, "User created from Google sign-in");
        self.event_sender
            .send_logged(Event::UserRegistered(created.id))
            .await;

        Ok(created)
    }

    /// Stamps the last-login timestamp
    #[instrument(skip(self))]
    pub async fn record_login(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let Some(account) = user::Entity::find_by_id(user_id).one(db).await? else {
            return Ok(());
        };

        let mut active: user::ActiveModel = account.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(db).await?;
        Ok(())
    }

    /// Gets an account by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(user::Entity::find_by_id(user_id).one(db).await?)
    }
}
