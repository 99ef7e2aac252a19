use crate::{db::DbPool, entities::product, errors::ServiceError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price cannot be negative".into(),
            ));
        }

        let existing = product::Entity::find()
            .filter(product::Column::Sku.eq(input.sku.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU '{}' is already in use",
                input.sku
            )));
        }

        let active = product::ActiveModel {
            sku: Set(input.sku),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            currency: Set(input.currency.to_uppercase()),
            ..Default::default()
        };

        Ok(active.insert(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        product_id: Uuid,
    ) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(product::Entity::find_by_id(product_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u64,
        limit: u64,
        active_only: bool,
        search: Option<String>,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = product::Entity::find();

        if active_only {
            query = query.filter(product::Column::Active.eq(true));
        }

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(&term))
                    .add(product::Column::Sku.contains(&term)),
            );
        }

        let paginator = query
            .order_by_asc(product::Column::Name)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((products, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = product::Entity::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Price cannot be negative".into(),
                ));
            }
        }

        let mut active: product::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(is_active) = input.active {
            active.active = Set(is_active);
        }

        Ok(active.update(db).await?)
    }
}
