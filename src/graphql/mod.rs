//! GraphQL surface: a thin pass-through over the same services the REST
//! handlers use, with dataloaders batching the nested lookups.

pub mod loaders;
pub mod resolvers;
pub mod schema;
pub mod types;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::AppState;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Extension, Router,
};

pub use schema::{build_schema, AppSchema, GraphQLContext};

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// GraphQL endpoint handler; the authenticated user rides along as request
/// data so mutations can check roles.
async fn graphql_handler(
    Extension(schema): Extension<AppSchema>,
    user: Option<Extension<AuthUser>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(Extension(user)) = user {
        request = request.data(user);
    }
    schema.execute(request).await.into()
}

/// GraphQL routes: the IDE is public, the endpoint requires a bearer token.
pub fn routes(state: &AppState) -> Router<AppState> {
    let schema = build_schema(state);

    let endpoint = Router::new()
        .route("/graphql", axum::routing::post(graphql_handler))
        .layer(Extension(schema))
        .with_auth();

    Router::new()
        .route("/graphiql", get(graphiql))
        .merge(endpoint)
}
