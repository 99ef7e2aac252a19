pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_asset_holders_table;
mod m20240101_000002_create_assets_table;
mod m20240101_000003_create_assignments_table;
mod m20240101_000004_create_maintenance_logs_table;
mod m20240101_000005_create_shipments_table;
mod m20240101_000006_create_return_requests_table;
mod m20240115_000007_create_customers_table;
mod m20240115_000008_create_products_table;
mod m20240115_000009_create_orders_tables;
mod m20240901_000010_create_auth_tables;
mod m20250301_000011_add_tracking_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_asset_holders_table::Migration),
            Box::new(m20240101_000002_create_assets_table::Migration),
            Box::new(m20240101_000003_create_assignments_table::Migration),
            Box::new(m20240101_000004_create_maintenance_logs_table::Migration),
            Box::new(m20240101_000005_create_shipments_table::Migration),
            Box::new(m20240101_000006_create_return_requests_table::Migration),
            Box::new(m20240115_000007_create_customers_table::Migration),
            Box::new(m20240115_000008_create_products_table::Migration),
            Box::new(m20240115_000009_create_orders_tables::Migration),
            Box::new(m20240901_000010_create_auth_tables::Migration),
            Box::new(m20250301_000011_add_tracking_indexes::Migration),
        ]
    }
}
