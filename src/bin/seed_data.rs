//! Seed a development database with a small, realistic data set.

use assettrack_api as api;

use api::entities::asset;
use api::events::EventSender;
use api::handlers::AppServices;
use api::services::asset_holders::CreateHolderInput;
use api::services::assets::CreateAssetInput;
use api::services::assignments::AssignAssetInput;
use api::services::customers::CreateCustomerInput;
use api::services::products::CreateProductInput;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let database_url = std::env::var("APP__DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://assettrack.db?mode=rwc".to_string());

    let db = Arc::new(api::db::establish_connection(&database_url).await?);
    api::db::run_migrations(&db).await?;

    // Seed runs don't need a live event processor; drain into a closed channel
    let (event_tx, mut event_rx) = mpsc::channel(256);
    tokio::spawn(async move { while event_rx.recv().await.is_some() {} });
    let services = AppServices::new(db.clone(), Arc::new(EventSender::new(event_tx)));

    info!("Seeding holders");
    let alice = services
        .holders
        .create_holder(CreateHolderInput {
            name: "Alice Nguyen".into(),
            email: "alice.nguyen@example.com".into(),
            department: Some("Engineering".into()),
            phone: Some("+1-206-555-0101".into()),
        })
        .await?;
    let facilities = services
        .holders
        .create_holder(CreateHolderInput {
            name: "Facilities".into(),
            email: "facilities@example.com".into(),
            department: Some("Operations".into()),
            phone: None,
        })
        .await?;

    info!("Seeding assets");
    let laptop = services
        .assets
        .create_asset(CreateAssetInput {
            asset_tag: "IT-0001".into(),
            name: "MacBook Pro 14\"".into(),
            description: Some("M3, 36 GB RAM".into()),
            category: asset::AssetCategory::Laptop,
            serial_number: Some("C02XL0GZJHD3".into()),
            location: Some("Seattle HQ / Floor 3".into()),
            purchase_date: Some(Utc::now() - Duration::days(120)),
            purchase_price: Some(dec!(2499.00)),
            warranty_until: Some(Utc::now() + Duration::days(610)),
            notes: None,
        })
        .await?;
    let monitor = services
        .assets
        .create_asset(CreateAssetInput {
            asset_tag: "IT-0002".into(),
            name: "Dell U2723QE".into(),
            description: None,
            category: asset::AssetCategory::Monitor,
            serial_number: Some("CN-0H2YT3".into()),
            location: Some("Seattle HQ / Storage".into()),
            purchase_date: Some(Utc::now() - Duration::days(400)),
            purchase_price: Some(dec!(579.99)),
            warranty_until: None,
            notes: Some("Spare unit".into()),
        })
        .await?;
    services
        .assets
        .create_asset(CreateAssetInput {
            asset_tag: "OPS-0001".into(),
            name: "Pallet jack".into(),
            description: None,
            category: asset::AssetCategory::Tool,
            serial_number: None,
            location: Some("Portland warehouse".into()),
            purchase_date: None,
            purchase_price: None,
            warranty_until: None,
            notes: None,
        })
        .await?;

    info!("Seeding an active assignment");
    services
        .assignments
        .assign_asset(AssignAssetInput {
            asset_id: laptop.id,
            holder_id: alice.id,
            due_at: Some(Utc::now() + Duration::days(180)),
            condition_out: Some("New, sealed box".into()),
            notes: None,
        })
        .await?;
    services
        .assignments
        .assign_asset(AssignAssetInput {
            asset_id: monitor.id,
            holder_id: facilities.id,
            due_at: None,
            condition_out: None,
            notes: Some("Conference room B".into()),
        })
        .await?;

    info!("Seeding customers and products");
    services
        .customers
        .create_customer(CreateCustomerInput {
            name: "Cascadia Rentals".into(),
            email: "ops@cascadiarentals.example.com".into(),
            phone: None,
            address: Some("1200 Pine St, Seattle, WA".into()),
        })
        .await?;
    services
        .products
        .create_product(CreateProductInput {
            sku: "SVC-CAL-01".into(),
            name: "Calibration service".into(),
            description: Some("Annual calibration for measurement tools".into()),
            price: dec!(149.00),
            currency: "USD".into(),
        })
        .await?;

    info!("Seed data loaded");
    Ok(())
}
