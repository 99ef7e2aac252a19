use crate::entities::return_request as domain;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};
use chrono::{DateTime, Utc};

/// GraphQL representation of a ReturnRequest
#[derive(Clone)]
pub struct ReturnRequest {
    pub inner: domain::Model,
}

impl From<domain::Model> for ReturnRequest {
    fn from(model: domain::Model) -> Self {
        Self { inner: model }
    }
}

#[Object]
impl ReturnRequest {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn requested_by(&self) -> &str {
        &self.inner.requested_by
    }

    async fn reason(&self) -> &str {
        &self.inner.reason
    }

    async fn status(&self) -> String {
        self.inner.status.to_string()
    }

    async fn resolution_notes(&self) -> Option<&str> {
        self.inner.resolution_notes.as_deref()
    }

    async fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.resolved_at
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// The assignment being returned
    async fn assignment(&self, ctx: &Context<'_>) -> FieldResult<Option<super::Assignment>> {
        let context = ctx.data::<GraphQLContext>()?;

        let found = context
            .services
            .assignments
            .get_assignment(self.inner.assignment_id)
            .await?;

        Ok(found.map(Into::into))
    }
}
