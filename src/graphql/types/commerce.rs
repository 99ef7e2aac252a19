use crate::entities::{customer, order, order_item, product};
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// GraphQL representation of a Customer
#[derive(Clone)]
pub struct Customer {
    pub inner: customer::Model,
}

impl From<customer::Model> for Customer {
    fn from(model: customer::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Customer {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    async fn phone(&self) -> Option<&str> {
        self.inner.phone.as_deref()
    }

    async fn address(&self) -> Option<&str> {
        self.inner.address.as_deref()
    }

    /// Orders placed by this customer, newest first
    async fn orders(&self, ctx: &Context<'_>) -> FieldResult<Vec<Order>> {
        let context = ctx.data::<GraphQLContext>()?;

        let (records, _total) = context
            .services
            .orders
            .list_orders(1, 100, Some(self.inner.id), None)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

/// GraphQL representation of a Product
#[derive(Clone)]
pub struct Product {
    pub inner: product::Model,
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Product {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn sku(&self) -> &str {
        &self.inner.sku
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    async fn price(&self) -> Decimal {
        self.inner.price
    }

    async fn currency(&self) -> &str {
        &self.inner.currency
    }

    async fn active(&self) -> bool {
        self.inner.active
    }
}

/// GraphQL representation of an Order
#[derive(Clone)]
pub struct Order {
    pub inner: order::Model,
}

impl From<order::Model> for Order {
    fn from(model: order::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Order {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn order_number(&self) -> &str {
        &self.inner.order_number
    }

    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn total_amount(&self) -> Decimal {
        self.inner.total_amount
    }

    async fn currency(&self) -> &str {
        &self.inner.currency
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// The customer who placed the order
    async fn customer(&self, ctx: &Context<'_>) -> FieldResult<Option<Customer>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context
            .services
            .customers
            .get_customer(self.inner.customer_id)
            .await?;
        Ok(found.map(Into::into))
    }

    /// Line items on the order
    async fn items(&self, ctx: &Context<'_>) -> FieldResult<Vec<OrderItem>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.orders.get_order(self.inner.id).await?;
        Ok(found
            .map(|(_, items)| items.into_iter().map(Into::into).collect())
            .unwrap_or_default())
    }
}

/// GraphQL representation of an OrderItem
#[derive(Clone)]
pub struct OrderItem {
    pub inner: order_item::Model,
}

impl From<order_item::Model> for OrderItem {
    fn from(model: order_item::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl OrderItem {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn quantity(&self) -> i32 {
        self.inner.quantity
    }

    async fn unit_price(&self) -> Decimal {
        self.inner.unit_price
    }

    async fn line_total(&self) -> Decimal {
        self.inner.line_total()
    }

    /// The product ordered
    async fn product(&self, ctx: &Context<'_>) -> FieldResult<Option<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context
            .services
            .products
            .get_product(self.inner.product_id)
            .await?;
        Ok(found.map(Into::into))
    }
}
