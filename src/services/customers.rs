use crate::{db::DbPool, entities::customer, errors::ServiceError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = customer::Entity::find()
            .filter(customer::Column::Email.eq(input.email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A customer with email '{}' already exists",
                input.email
            )));
        }

        let active = customer::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            ..Default::default()
        };

        Ok(active.insert(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(customer::Entity::find_by_id(customer_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        limit: u64,
        search: Option<String>,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = customer::Entity::find();

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(customer::Column::Name.contains(&term))
                    .add(customer::Column::Email.contains(&term)),
            );
        }

        let paginator = query
            .order_by_asc(customer::Column::Name)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((customers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;
        let model = customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))?;

        let mut active: customer::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }

        Ok(active.update(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))?;

        customer::Entity::delete_by_id(model.id).exec(db).await?;
        Ok(())
    }
}
