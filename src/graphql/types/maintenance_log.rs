use crate::entities::maintenance_log as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// GraphQL representation of a MaintenanceLog
#[derive(Clone)]
pub struct MaintenanceLog {
    pub inner: domain::Model,
}

impl From<domain::Model> for MaintenanceLog {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl MaintenanceLog {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn maintenance_type(&self) -> String {
        self.inner.maintenance_type.to_string()
    }

    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn description(&self) -> &str {
        &self.inner.description
    }

    async fn performed_by(&self) -> Option<&str> {
        self.inner.performed_by.as_deref()
    }

    async fn cost(&self) -> Option<Decimal> {
        self.inner.cost
    }

    async fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        self.inner.scheduled_for
    }

    async fn started_at(&self) -> Option<DateTime<Utc>> {
        self.inner.started_at
    }

    async fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.completed_at
    }

    /// The asset under maintenance
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
