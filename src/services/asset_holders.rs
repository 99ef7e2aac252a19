use crate::{
    db::DbPool,
    entities::asset_holder,
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Input for registering a holder
#[derive(Debug, Clone)]
pub struct CreateHolderInput {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub phone: Option<String>,
}

/// Partial update for a holder
#[derive(Debug, Clone, Default)]
pub struct UpdateHolderInput {
    pub name: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

/// Service for managing asset holders
#[derive(Clone)]
pub struct AssetHolderService {
    db_pool: Arc<DbPool>,
    #[allow(dead_code)]
    event_sender: Arc<EventSender>,
}

impl AssetHolderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new holder
    #[instrument(skip(self, input))]
    pub async fn create_holder(
        &self,
        input: CreateHolderInput,
    ) -> Result<asset_holder::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = asset_holder::Entity::find()
            .filter(asset_holder::Column::Email.eq(input.email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A holder with email '{}' already exists",
                input.email
            )));
        }

        let active = asset_holder::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            department: Set(input.department),
            phone: Set(input.phone),
            ..Default::default()
        };

        Ok(active.insert(db).await?)
    }

    /// Gets a holder by ID
    #[instrument(skip(self))]
    pub async fn get_holder(
        &self,
        holder_id: Uuid,
    ) -> Result<Option<asset_holder::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(asset_holder::Entity::find_by_id(holder_id).one(db).await?)
    }

    /// Lists holders with pagination; `active_only` hides deactivated entries
    #[instrument(skip(self))]
    pub async fn list_holders(
        &self,
        page: u64,
        limit: u64,
        active_only: bool,
        search: Option<String>,
    ) -> Result<(Vec<asset_holder::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = asset_holder::Entity::find();

        if active_only {
            query = query.filter(asset_holder::Column::Active.eq(true));
        }

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(asset_holder::Column::Name.contains(&term))
                    .add(asset_holder::Column::Email.contains(&term))
                    .add(asset_holder::Column::Department.contains(&term)),
            );
        }

        let paginator = query
            .order_by_asc(asset_holder::Column::Name)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let holders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((holders, total))
    }

    /// Updates holder contact details
    #[instrument(skip(self, input))]
    pub async fn update_holder(
        &self,
        holder_id: Uuid,
        input: UpdateHolderInput,
    ) -> Result<asset_holder::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = asset_holder::Entity::find_by_id(holder_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Holder {} not found", holder_id)))?;

        let mut active: asset_holder::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(department) = input.department {
            active.department = Set(Some(department));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }

        Ok(active.update(db).await?)
    }

    /// Deactivates a holder; history is preserved but new assignments are
    /// rejected by the assignment service.
    #[instrument(skip(self))]
    pub async fn deactivate_holder(
        &self,
        holder_id: Uuid,
    ) -> Result<asset_holder::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = asset_holder::Entity::find_by_id(holder_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Holder {} not found", holder_id)))?;

        if !model.active {
            return Err(ServiceError::InvalidOperation(format!(
                "Holder {} is already inactive",
                holder_id
            )));
        }

        let mut active: asset_holder::ActiveModel = model.into();
        active.active = Set(false);
        Ok(active.update(db).await?)
    }
}
