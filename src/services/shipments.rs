use crate::{
    db::DbPool,
    entities::{asset, shipment},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::assignments::unwrap_txn_error;

/// Input for creating a shipment
#[derive(Debug, Clone)]
pub struct CreateShipmentInput {
    pub asset_id: Uuid,
    pub tracking_number: String,
    pub carrier: shipment::ShippingCarrier,
    pub origin: String,
    pub destination: String,
    pub recipient_name: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Service for managing shipments
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ShipmentService {
    /// Creates a new shipment service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a shipment in Pending state. The asset must be Available; it
    /// stays Available until dispatch actually moves it.
    #[instrument(skip(self, input))]
    pub async fn create_shipment(
        &self,
        input: CreateShipmentInput,
    ) -> Result<shipment::Model, ServiceError> {
        let db = &*self.db_pool;

        let asset_model = asset::Entity::find_by_id(input.asset_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", input.asset_id)))?;

        if asset_model.status != asset::AssetStatus::Available {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot ship asset {} while it is {}",
                asset_model.asset_tag, asset_model.status
            )));
        }

        let existing = shipment::Entity::find()
            .filter(shipment::Column::TrackingNumber.eq(input.tracking_number.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Tracking number '{}' is already in use",
                input.tracking_number
            )));
        }

        let record = shipment::ActiveModel {
            asset_id: Set(input.asset_id),
            tracking_number: Set(input.tracking_number),
            carrier: Set(input.carrier),
            status: Set(shipment::ShipmentStatus::Pending),
            origin: Set(input.origin),
            destination: Set(input.destination),
            recipient_name: Set(input.recipient_name),
            estimated_delivery: Set(input.estimated_delivery),
            notes: Set(input.notes),
            ..Default::default()
        };
        let created = record.insert(db).await?;

        self.event_sender
            .send_logged(Event::ShipmentCreated(created.id))
            .await;

        Ok(created)
    }

    /// Dispatches a pending shipment; the asset goes InTransit
    #[instrument(skip(self))]
    pub async fn dispatch(&self, shipment_id: Uuid) -> Result<shipment::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, shipment::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = shipment::Entity::find_by_id(shipment_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
                        })?;

                    record
                        .check_transition(shipment::ShipmentStatus::InTransit)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    let asset_id = record.asset_id;

                    let mut active: shipment::ActiveModel = record.into();
                    active.status = Set(shipment::ShipmentStatus::InTransit);
                    active.shipped_at = Set(Some(Utc::now()));
                    let updated = active.update(txn).await?;

                    let asset_model = asset::Entity::find_by_id(asset_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Asset {} not found", asset_id))
                        })?;

                    if asset_model.status != asset::AssetStatus::Available {
                        return Err(ServiceError::InvalidOperation(format!(
                            "Cannot dispatch: asset {} is {}",
                            asset_model.asset_tag, asset_model.status
                        )));
                    }

                    let mut asset_active: asset::ActiveModel = asset_model.into();
                    asset_active.status = Set(asset::AssetStatus::InTransit);
                    asset_active.update(txn).await?;

                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::ShipmentDispatched(updated.id))
            .await;

        Ok(updated)
    }

    /// Marks a shipment delivered; the asset lands Available at the
    /// destination.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, shipment_id: Uuid) -> Result<shipment::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, shipment::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = shipment::Entity::find_by_id(shipment_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
                        })?;

                    record
                        .check_transition(shipment::ShipmentStatus::Delivered)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    let asset_id = record.asset_id;
                    let destination = record.destination.clone();

                    let mut active: shipment::ActiveModel = record.into();
                    active.status = Set(shipment::ShipmentStatus::Delivered);
                    active.delivered_at = Set(Some(Utc::now()));
                    let updated = active.update(txn).await?;

                    let asset_model = asset::Entity::find_by_id(asset_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Asset {} not found", asset_id))
                        })?;

                    let mut asset_active: asset::ActiveModel = asset_model.into();
                    asset_active.status = Set(asset::AssetStatus::Available);
                    asset_active.location = Set(Some(destination));
                    asset_active.update(txn).await?;

                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::ShipmentDelivered(updated.id))
            .await;

        Ok(updated)
    }

    /// Cancels a shipment; an in-transit asset returns to Available at the
    /// origin.
    #[instrument(skip(self))]
    pub async fn cancel(&self, shipment_id: Uuid) -> Result<shipment::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, shipment::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = shipment::Entity::find_by_id(shipment_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
                        })?;

                    record
                        .check_transition(shipment::ShipmentStatus::Cancelled)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    let was_in_transit = record.status == shipment::ShipmentStatus::InTransit;
                    let asset_id = record.asset_id;

                    let mut active: shipment::ActiveModel = record.into();
                    active.status = Set(shipment::ShipmentStatus::Cancelled);
                    let updated = active.update(txn).await?;

                    if was_in_transit {
                        let asset_model = asset::Entity::find_by_id(asset_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!("Asset {} not found", asset_id))
                            })?;

                        let mut asset_active: asset::ActiveModel = asset_model.into();
                        asset_active.status = Set(asset::AssetStatus::Available);
                        asset_active.update(txn).await?;
                    }

                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::ShipmentCancelled(updated.id))
            .await;

        Ok(updated)
    }

    /// Finds shipment by tracking number
    #[instrument(skip(self))]
    pub async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<shipment::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(shipment::Entity::find()
            .filter(shipment::Column::TrackingNumber.eq(tracking_number))
            .one(db)
            .await?)
    }

    /// Gets a shipment by ID
    #[instrument(skip(self))]
    pub async fn get_shipment(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<shipment::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(shipment::Entity::find_by_id(shipment_id).one(db).await?)
    }

    /// Lists shipments with pagination and optional status filter
    #[instrument(skip(self))]
    pub async fn list_shipments(
        &self,
        page: u64,
        limit: u64,
        status: Option<String>,
    ) -> Result<(Vec<shipment::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = shipment::Entity::find();

        if let Some(status_filter) = status {
            match status_filter.parse::<shipment::ShipmentStatus>() {
                Ok(parsed) => query = query.filter(shipment::Column::Status.eq(parsed)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(shipment::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let shipments = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((shipments, total))
    }
}
