use crate::{
    db::DbPool,
    entities::{asset, assignment},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Input for registering a new asset
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    pub asset_tag: String,
    pub name: String,
    pub description: Option<String>,
    pub category: asset::AssetCategory,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<Decimal>,
    pub warranty_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Partial update for an asset; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateAssetInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub warranty_until: Option<DateTime<Utc>>,
}

/// Filters for asset listings
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Service for managing assets
#[derive(Clone)]
pub struct AssetService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AssetService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new asset; new assets start Available
    #[instrument(skip(self, input))]
    pub async fn create_asset(&self, input: CreateAssetInput) -> Result<asset::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = asset::Entity::find()
            .filter(asset::Column::AssetTag.eq(input.asset_tag.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Asset tag '{}' is already in use",
                input.asset_tag
            )));
        }

        let active = asset::ActiveModel {
            asset_tag: Set(input.asset_tag),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            serial_number: Set(input.serial_number),
            status: Set(asset::AssetStatus::Available),
            location: Set(input.location),
            purchase_date: Set(input.purchase_date),
            purchase_price: Set(input.purchase_price),
            warranty_until: Set(input.warranty_until),
            notes: Set(input.notes),
            ..Default::default()
        };

        let created = active.insert(db).await?;

        self.event_sender
            .send_logged(Event::AssetCreated(created.id))
            .await;

        Ok(created)
    }

    /// Gets an asset by ID
    #[instrument(skip(self))]
    pub async fn get_asset(&self, asset_id: Uuid) -> Result<Option<asset::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(asset::Entity::find_by_id(asset_id).one(db).await?)
    }

    /// Gets an asset by its tag
    #[instrument(skip(self))]
    pub async fn get_asset_by_tag(&self, tag: &str) -> Result<Option<asset::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(asset::Entity::find()
            .filter(asset::Column::AssetTag.eq(tag))
            .one(db)
            .await?)
    }

    /// Lists assets with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_assets(
        &self,
        page: u64,
        limit: u64,
        filter: AssetFilter,
    ) -> Result<(Vec<asset::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = asset::Entity::find();

        if let Some(status_filter) = filter.status {
            match status_filter.parse::<asset::AssetStatus>() {
                Ok(status) => query = query.filter(asset::Column::Status.eq(status)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        if let Some(category_filter) = filter.category {
            match category_filter.parse::<asset::AssetCategory>() {
                Ok(category) => query = query.filter(asset::Column::Category.eq(category)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(asset::Column::Name.contains(&term))
                    .add(asset::Column::AssetTag.contains(&term))
                    .add(asset::Column::SerialNumber.contains(&term)),
            );
        }

        let paginator = query
            .order_by_desc(asset::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let assets = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((assets, total))
    }

    /// Updates descriptive fields of an asset
    #[instrument(skip(self, input))]
    pub async fn update_asset(
        &self,
        asset_id: Uuid,
        input: UpdateAssetInput,
    ) -> Result<asset::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = asset::Entity::find_by_id(asset_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", asset_id)))?;

        let mut active: asset::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(serial_number) = input.serial_number {
            active.serial_number = Set(Some(serial_number));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(warranty_until) = input.warranty_until {
            active.warranty_until = Set(Some(warranty_until));
        }

        let updated = active.update(db).await?;

        self.event_sender
            .send_logged(Event::AssetUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Retires an asset. Assets currently held, in maintenance, or in transit
    /// must be released first.
    #[instrument(skip(self))]
    pub async fn retire_asset(&self, asset_id: Uuid) -> Result<asset::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = asset::Entity::find_by_id(asset_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", asset_id)))?;

        match model.status {
            asset::AssetStatus::Available => {}
            asset::AssetStatus::Retired => {
                return Err(ServiceError::InvalidOperation(format!(
                    "Asset {} is already retired",
                    asset_id
                )))
            }
            other => {
                return Err(ServiceError::InvalidOperation(format!(
                    "Cannot retire asset while it is {}",
                    other
                )))
            }
        }

        let mut active: asset::ActiveModel = model.into();
        active.status = Set(asset::AssetStatus::Retired);
        let updated = active.update(db).await?;

        self.event_sender
            .send_logged(Event::AssetRetired(updated.id))
            .await;

        Ok(updated)
    }

    /// Deletes an asset. Only assets with no assignment history can be
    /// removed; anything that has circulated should be retired instead.
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, asset_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = asset::Entity::find_by_id(asset_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", asset_id)))?;

        let assignment_count = assignment::Entity::find()
            .filter(assignment::Column::AssetId.eq(asset_id))
            .count(db)
            .await?;
        if assignment_count > 0 {
            return Err(ServiceError::InvalidOperation(
                "Assets with assignment history cannot be deleted; retire them instead".into(),
            ));
        }

        asset::Entity::delete_by_id(model.id).exec(db).await?;
        Ok(())
    }
}
