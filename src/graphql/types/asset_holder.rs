use crate::entities::asset_holder as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};

/// GraphQL representation of an AssetHolder
#[derive(Clone)]
pub struct AssetHolder {
    pub inner: domain::Model,
}

impl From<domain::Model> for AssetHolder {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl AssetHolder {
    /// The unique identifier for the holder
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    async fn department(&self) -> Option<&str> {
        self.inner.department.as_deref()
    }

    async fn phone(&self) -> Option<&str> {
        self.inner.phone.as_deref()
    }

    /// Whether the holder can receive new assignments
    async fn active(&self) -> bool {
        self.inner.active
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Assignments held by this holder, newest first
    async fn assignments(&self, ctx: &Context<'_>) -> FieldResult<Vec<super::Assignment>> {
        let context = ctx.data::<GraphQLContext>()?;

        let (records, _total) = context
            .services
            .assignments
            .list_assignments(
                1,
                100,
                crate::services::assignments::AssignmentFilter {
                    holder_id: Some(self.inner.id),
                    ..Default::default()
                },
            )
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
