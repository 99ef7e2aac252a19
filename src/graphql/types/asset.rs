use crate::entities::asset as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

/// GraphQL representation of an Asset
#[derive(Clone)]
pub struct Asset {
    pub inner: domain::Model,
}

impl From<domain::Model> for Asset {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Asset {
    /// The unique identifier for the asset
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    /// Organization-wide tag on the physical label
    async fn asset_tag(&self) -> &str {
        &self.inner.asset_tag
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    async fn category(&self) -> String {
        self.inner.category.to_string()
    }

    async fn serial_number(&self) -> Option<&str> {
        self.inner.serial_number.as_deref()
    }

    /// Lifecycle status
    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn location(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    async fn purchase_date(&self) -> Option<DateTime<Utc>> {
        self.inner.purchase_date
    }

    async fn purchase_price(&self) -> Option<Decimal> {
        self.inner.purchase_price
    }

    async fn warranty_until(&self) -> Option<DateTime<Utc>> {
        self.inner.warranty_until
    }

    async fn notes(&self) -> Option<&str> {
        self.inner.notes.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Assignment history for this asset, newest first
    async fn assignments(&self, ctx: &Context<'_>) -> FieldResult<Vec<super::Assignment>> {
        let context = ctx.data::<GraphQLContext>()?;

        let (records, _total) = context
            .services
            .assignments
            .list_assignments(
                1,
                100,
                crate::services::assignments::AssignmentFilter {
                    asset_id: Some(self.inner.id),
                    ..Default::default()
                },
            )
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Maintenance history for this asset, newest first
    async fn maintenance_logs(&self, ctx: &Context<'_>) -> FieldResult<Vec<super::MaintenanceLog>> {
        let context = ctx.data::<GraphQLContext>()?;

        let (records, _total) = context
            .services
            .maintenance
            .list_logs(
                1,
                100,
                crate::services::maintenance::MaintenanceFilter {
                    asset_id: Some(self.inner.id),
                    ..Default::default()
                },
            )
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Shipments that moved this asset, newest first
    async fn shipments(&self, ctx: &Context<'_>) -> FieldResult<Vec<super::Shipment>> {
        let context = ctx.data::<GraphQLContext>()?;

        let rows = crate::entities::shipment::Entity::find()
            .filter(crate::entities::shipment::Column::AssetId.eq(self.inner.id))
            .order_by_desc(crate::entities::shipment::Column::CreatedAt)
            .all(&*context.db)
            .await
            .map_err(crate::errors::ServiceError::DatabaseError)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
