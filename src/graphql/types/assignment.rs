use crate::entities::assignment as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};

/// GraphQL representation of an Assignment
#[derive(Clone)]
pub struct Assignment {
    pub inner: domain::Model,
}

impl From<domain::Model> for Assignment {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl Assignment {
    /// The unique identifier for the assignment
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn assigned_at(&self) -> DateTime<Utc> {
        self.inner.assigned_at
    }

    async fn due_at(&self) -> Option<DateTime<Utc>> {
        self.inner.due_at
    }

    async fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.inner.returned_at
    }

    async fn condition_out(&self) -> Option<&str> {
        self.inner.condition_out.as_deref()
    }

    async fn condition_in(&self) -> Option<&str> {
        self.inner.condition_in.as_deref()
    }

    async fn notes(&self) -> Option<&str> {
        self.inner.notes.as_deref()
    }

    /// The asset being held
    async fn asset(&self, ctx: &Context<'_>) -> FieldResult<Option<super::Asset>> {
        let context = ctx.data::<GraphQLContext>()?;

        // Use DataLoader to batch asset lookups
        match context.asset_loader.load_one(self.inner.asset_id).await {
            Ok(Some(asset)) => Ok(Some(asset.into())),
            Ok(None) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(format!(
                "Failed to load asset: {}",
                e
            ))),
        }
    }

    /// The holder responsible for the asset
    async fn holder(&self, ctx: &Context<'_>) -> FieldResult<Option<super::AssetHolder>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.holder_loader.load_one(self.inner.holder_id).await {
            Ok(Some(holder)) => Ok(Some(holder.into())),
            Ok(None) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(format!(
                "Failed to load holder: {}",
                e
            ))),
        }
    }
}
