use crate::entities::shipment as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};

/// GraphQL representation of a Shipment
#[derive(Clone)]
pub struct Shipment {
    pub inner: domain::Model,
}

impl From<domain::Model> for Shipment {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Shipment {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn tracking_number(&self) -> &str {
        &self.inner.tracking_number
    }

    async fn carrier(&self) -> String {
        self.inner.carrier.to_string()
    }

    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn origin(&self) -> &str {
        &self.inner.origin
    }

    async fn destination(&self) -> &str {
        &self.inner.destination
    }

    async fn recipient_name(&self) -> &str {
        &self.inner.recipient_name
    }

    /// Carrier tracking page, when the carrier is known
    async fn tracking_url(&self) -> Option<String> {
        self.inner.tracking_url()
    }

    async fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.inner.shipped_at
    }

    async fn estimated_delivery(&self) -> Option<DateTime<Utc>> {
        self.inner.estimated_delivery
    }

    async fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.inner.delivered_at
    }

    async fn notes(&self) -> Option<&str> {
        self.inner.notes.as_deref()
    }

    /// The asset being moved
    async fn asset(&self, ctx: &Context<'_>) -> FieldResult<Option<super::Asset>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.asset_loader.load_one(self.inner.asset_id).await {
            Ok(Some(asset)) => Ok(Some(asset.into())),
            Ok(None) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(format!(
                "Failed to load asset: {}",
                e
            ))),
        }
    }
}
