//! Dataloaders batching the per-row lookups behind nested fields.

use crate::db::DbPool;
use crate::entities::{asset, asset_holder};
use crate::errors::ServiceError;
use async_graphql::dataloader::Loader;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct AssetLoader {
    db: Arc<DbPool>,
}

impl AssetLoader {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

impl Loader<Uuid> for AssetLoader {
    type Value = asset::Model;
    type Error = Arc<ServiceError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = asset::Entity::find()
            .filter(asset::Column::Id.is_in(keys.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(|e| Arc::new(ServiceError::DatabaseError(e)))?;

        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}

pub struct HolderLoader {
    db: Arc<DbPool>,
}

impl HolderLoader {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

impl Loader<Uuid> for HolderLoader {
    type Value = asset_holder::Model;
    type Error = Arc<ServiceError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = asset_holder::Entity::find()
            .filter(asset_holder::Column::Id.is_in(keys.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(|e| Arc::new(ServiceError::DatabaseError(e)))?;

        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}
