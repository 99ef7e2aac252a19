use crate::{
    db::DbPool,
    entities::{customer, order, order_item, product},
    errors::ServiceError,
    events::{Event, EventSender},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::assignments::unwrap_txn_error;

/// A requested order line
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Input for creating an order
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub customer_id: Uuid,
    pub currency: Option<String>,
    pub items: Vec<OrderLineInput>,
}

/// Service for managing orders
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an order with its line items in one transaction.
    /// Unit prices are taken from the catalog; the total is the sum of lines.
    #[instrument(skip(self, input))]
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<(order::Model, Vec<order_item::Model>), ServiceError> {
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "An order needs at least one item".into(),
            ));
        }
        if input.items.iter().any(|line| line.quantity < 1) {
            return Err(ServiceError::ValidationError(
                "Item quantities must be at least 1".into(),
            ));
        }

        let db = &*self.db_pool;

        let (created, items) = db
            .transaction::<_, (order::Model, Vec<order_item::Model>), ServiceError>(|txn| {
                Box::pin(async move {
                    let buyer = customer::Entity::find_by_id(input.customer_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Customer {} not found",
                                input.customer_id
                            ))
                        })?;

                    let mut total = Decimal::ZERO;
                    let mut lines = Vec::with_capacity(input.items.len());
                    for line in &input.items {
                        let item = product::Entity::find_by_id(line.product_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::ValidationError(format!(
                                    "Unknown product {}",
                                    line.product_id
                                ))
                            })?;

                        if !item.active {
                            return Err(ServiceError::ValidationError(format!(
                                "Product '{}' is not orderable",
                                item.sku
                            )));
                        }

                        total += item.price * Decimal::from(line.quantity);
                        lines.push((item, line.quantity));
                    }

                    let currency = input
                        .currency
                        .map(|c| c.to_uppercase())
                        .unwrap_or_else(|| "USD".to_string());

                    let record = order::ActiveModel {
                        order_number: Set(generate_order_number()),
                        customer_id: Set(buyer.id),
                        status: Set(order::OrderStatus::Pending),
                        total_amount: Set(total),
                        currency: Set(currency),
                        ..Default::default()
                    };
                    let created = record.insert(txn).await?;

                    let mut items = Vec::with_capacity(lines.len());
                    for (item, quantity) in lines {
                        let line = order_item::ActiveModel {
                            order_id: Set(created.id),
                            product_id: Set(item.id),
                            quantity: Set(quantity),
                            unit_price: Set(item.price),
                            ..Default::default()
                        };
                        items.push(line.insert(txn).await?);
                    }

                    Ok((created, items))
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::OrderCreated(created.id))
            .await;

        Ok((created, items))
    }

    /// Gets an order with its items
    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<(order::Model, Vec<order_item::Model>)>, ServiceError> {
        let db = &*self.db_pool;

        let Some(found) = order::Entity::find_by_id(order_id).one(db).await? else {
            return Ok(None);
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await?;

        Ok(Some((found, items)))
    }

    /// Lists orders with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        limit: u64,
        customer_id: Option<Uuid>,
        status: Option<String>,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = order::Entity::find();

        if let Some(customer_id) = customer_id {
            query = query.filter(order::Column::CustomerId.eq(customer_id));
        }
        if let Some(status_filter) = status {
            match status_filter.parse::<order::OrderStatus>() {
                Ok(parsed) => query = query.filter(order::Column::Status.eq(parsed)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((orders, total))
    }

    /// Confirms a pending order
    #[instrument(skip(self))]
    pub async fn confirm(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        self.update_status(order_id, order::OrderStatus::Confirmed).await
    }

    /// Fulfills a confirmed order
    #[instrument(skip(self))]
    pub async fn fulfill(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        self.update_status(order_id, order::OrderStatus::Fulfilled).await
    }

    /// Cancels an order that has not shipped
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        self.update_status(order_id, order::OrderStatus::Cancelled).await
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        new_status: order::OrderStatus,
    ) -> Result<order::Model, ServiceError> {
        let db = &*self.db_pool;
        let record = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        record
            .check_transition(new_status)
            .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

        let old_status = record.status.to_string();

        let mut active: order::ActiveModel = record.into();
        active.status = Set(new_status);
        let updated = active.update(db).await?;

        self.event_sender
            .send_logged(Event::OrderStatusChanged {
                order_id: updated.id,
                old_status,
                new_status: updated.status.to_string(),
            })
            .await;

        Ok(updated)
    }
}

/// Order numbers are short, unique, and human-quotable
fn generate_order_number() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", suffix[..12].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_are_prefixed_and_unique() {
        let first = generate_order_number();
        let second = generate_order_number();
        assert!(first.starts_with("ORD-"));
        assert_eq!(first.len(), "ORD-".len() + 12);
        assert_ne!(first, second);
    }
}
