use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Order status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    #[sea_orm(string_value = "Fulfilled")]
    Fulfilled,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Confirmed => write!(f, "Confirmed"),
            OrderStatus::Fulfilled => write!(f, "Fulfilled"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Unknown order status '{}'", other)),
        }
    }
}

/// Custom error type for order transitions
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Order entity model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 64,
        message = "Order number must be between 1 and 64 characters"
    ))]
    pub order_number: String,

    pub customer_id: Uuid,

    pub status: OrderStatus,

    pub total_amount: Decimal,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,

    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
            active_model.created_at = Set(Utc::now());
        }
        active_model.updated_at = Set(Utc::now());

        Ok(active_model)
    }
}

impl Model {
    /// Validate a status transition before applying it
    pub fn check_transition(&self, new_status: OrderStatus) -> Result<(), OrderError> {
        match (self.status, new_status) {
            (OrderStatus::Pending, OrderStatus::Confirmed) => Ok(()),
            (OrderStatus::Pending, OrderStatus::Cancelled) => Ok(()),
            (OrderStatus::Confirmed, OrderStatus::Fulfilled) => Ok(()),
            (OrderStatus::Confirmed, OrderStatus::Cancelled) => Ok(()),
            (current, new) => Err(OrderError::InvalidOperation(format!(
                "Invalid order transition from {} to {}",
                current, new
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(status: OrderStatus) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            order_number: "ORD-1001".into(),
            customer_id: Uuid::new_v4(),
            status,
            total_amount: dec!(199.99),
            currency: "USD".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn fulfilled_requires_confirmation_first() {
        assert!(order(OrderStatus::Pending)
            .check_transition(OrderStatus::Fulfilled)
            .is_err());
        assert!(order(OrderStatus::Confirmed)
            .check_transition(OrderStatus::Fulfilled)
            .is_ok());
    }

    #[test]
    fn fulfilled_orders_cannot_cancel() {
        assert!(order(OrderStatus::Fulfilled)
            .check_transition(OrderStatus::Cancelled)
            .is_err());
    }
}
