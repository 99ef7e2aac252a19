pub mod asset_holders;
pub mod assets;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod customers;
pub mod maintenance;
pub mod orders;
pub mod products;
pub mod returns;
pub mod shipments;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub assets: Arc<crate::services::assets::AssetService>,
    pub holders: Arc<crate::services::asset_holders::AssetHolderService>,
    pub assignments: Arc<crate::services::assignments::AssignmentService>,
    pub maintenance: Arc<crate::services::maintenance::MaintenanceService>,
    pub shipments: Arc<crate::services::shipments::ShipmentService>,
    pub returns: Arc<crate::services::returns::ReturnRequestService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub products: Arc<crate::services::products::ProductService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub users: Arc<crate::services::users::UserService>,
}

impl AppServices {
    /// Build the services container over the shared pool and event channel
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let assets = Arc::new(crate::services::assets::AssetService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let holders = Arc::new(crate::services::asset_holders::AssetHolderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let assignments = Arc::new(crate::services::assignments::AssignmentService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let maintenance = Arc::new(crate::services::maintenance::MaintenanceService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let shipments = Arc::new(crate::services::shipments::ShipmentService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let returns = Arc::new(crate::services::returns::ReturnRequestService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let customers = Arc::new(crate::services::customers::CustomerService::new(
            db_pool.clone(),
        ));
        let products = Arc::new(crate::services::products::ProductService::new(
            db_pool.clone(),
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let users = Arc::new(crate::services::users::UserService::new(
            db_pool,
            event_sender,
        ));

        Self {
            assets,
            holders,
            assignments,
            maintenance,
            shipments,
            returns,
            customers,
            products,
            orders,
            users,
        }
    }
}
