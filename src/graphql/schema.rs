use crate::db::DbPool;
use crate::graphql::loaders::{AssetLoader, HolderLoader};
use crate::graphql::resolvers::{Mutation, Query};
use crate::handlers::AppServices;
use crate::AppState;
use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    pub asset_loader: DataLoader<AssetLoader>,
    pub holder_loader: DataLoader<HolderLoader>,
}

/// The complete GraphQL schema
pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a new GraphQL schema over the application state
pub fn build_schema(state: &AppState) -> AppSchema {
    let asset_loader = DataLoader::new(AssetLoader::new(state.db.clone()), tokio::spawn);
    let holder_loader = DataLoader::new(HolderLoader::new(state.db.clone()), tokio::spawn);

    Schema::build(Query, Mutation, EmptySubscription)
        .data(GraphQLContext {
            db: state.db.clone(),
            services: state.services.clone(),
            asset_loader,
            holder_loader,
        })
        .finish()
}
