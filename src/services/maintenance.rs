use crate::{
    db::DbPool,
    entities::{asset, maintenance_log},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::assignments::unwrap_txn_error;

/// Input for scheduling maintenance on an asset
#[derive(Debug, Clone)]
pub struct ScheduleMaintenanceInput {
    pub asset_id: Uuid,
    pub maintenance_type: maintenance_log::MaintenanceType,
    pub description: String,
    pub performed_by: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Filters for maintenance listings
#[derive(Debug, Clone, Default)]
pub struct MaintenanceFilter {
    pub asset_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Service for managing maintenance logs
#[derive(Clone)]
pub struct MaintenanceService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MaintenanceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Schedules maintenance. An Available asset moves to InMaintenance;
    /// assets already in maintenance accept additional logs.
    #[instrument(skip(self, input))]
    pub async fn schedule(
        &self,
        input: ScheduleMaintenanceInput,
    ) -> Result<maintenance_log::Model, ServiceError> {
        let db = &*self.db_pool;

        let created = db
            .transaction::<_, maintenance_log::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let asset_model = asset::Entity::find_by_id(input.asset_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Asset {} not found", input.asset_id))
                        })?;

                    match asset_model.status {
                        asset::AssetStatus::Available | asset::AssetStatus::InMaintenance => {}
                        other => {
                            return Err(ServiceError::InvalidOperation(format!(
                                "Cannot open maintenance on asset {} while it is {}",
                                asset_model.asset_tag, other
                            )))
                        }
                    }

                    let record = maintenance_log::ActiveModel {
                        asset_id: Set(input.asset_id),
                        maintenance_type: Set(input.maintenance_type),
                        status: Set(maintenance_log::MaintenanceStatus::Scheduled),
                        description: Set(input.description),
                        performed_by: Set(input.performed_by),
                        scheduled_for: Set(input.scheduled_for),
                        ..Default::default()
                    };
                    let created = record.insert(txn).await?;

                    if asset_model.status == asset::AssetStatus::Available {
                        let mut asset_active: asset::ActiveModel = asset_model.into();
                        asset_active.status = Set(asset::AssetStatus::InMaintenance);
                        asset_active.update(txn).await?;
                    }

                    Ok(created)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::MaintenanceScheduled {
                asset_id: created.asset_id,
                log_id: created.id,
            })
            .await;

        Ok(created)
    }

    /// Marks a scheduled log as started
    #[instrument(skip(self))]
    pub async fn start(&self, log_id: Uuid) -> Result<maintenance_log::Model, ServiceError> {
        let db = &*self.db_pool;
        let record = self.require_log(log_id).await?;

        record
            .check_transition(maintenance_log::MaintenanceStatus::InProgress)
            .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

        let mut active: maintenance_log::ActiveModel = record.into();
        active.status = Set(maintenance_log::MaintenanceStatus::InProgress);
        active.started_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        self.event_sender
            .send_logged(Event::MaintenanceStarted(updated.id))
            .await;

        Ok(updated)
    }

    /// Completes a log; the asset returns to Available once no other open
    /// logs remain for it.
    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        log_id: Uuid,
        cost: Option<Decimal>,
        performed_by: Option<String>,
    ) -> Result<maintenance_log::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, maintenance_log::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = maintenance_log::Entity::find_by_id(log_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Maintenance log {} not found", log_id))
                        })?;

                    record
                        .check_transition(maintenance_log::MaintenanceStatus::Completed)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    let asset_id = record.asset_id;

                    let mut active: maintenance_log::ActiveModel = record.into();
                    active.status = Set(maintenance_log::MaintenanceStatus::Completed);
                    active.completed_at = Set(Some(Utc::now()));
                    if cost.is_some() {
                        active.cost = Set(cost);
                    }
                    if performed_by.is_some() {
                        active.performed_by = Set(performed_by);
                    }
                    let updated = active.update(txn).await?;

                    release_asset_if_idle(txn, asset_id).await?;

                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::MaintenanceCompleted {
                asset_id: updated.asset_id,
                log_id: updated.id,
            })
            .await;

        Ok(updated)
    }

    /// Cancels an open log; releases the asset like completion does
    #[instrument(skip(self))]
    pub async fn cancel(&self, log_id: Uuid) -> Result<maintenance_log::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, maintenance_log::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = maintenance_log::Entity::find_by_id(log_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Maintenance log {} not found", log_id))
                        })?;

                    record
                        .check_transition(maintenance_log::MaintenanceStatus::Canceled)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    let asset_id = record.asset_id;

                    let mut active: maintenance_log::ActiveModel = record.into();
                    active.status = Set(maintenance_log::MaintenanceStatus::Canceled);
                    let updated = active.update(txn).await?;

                    release_asset_if_idle(txn, asset_id).await?;

                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::MaintenanceCanceled(updated.id))
            .await;

        Ok(updated)
    }

    /// Gets a log by ID
    #[instrument(skip(self))]
    pub async fn get_log(
        &self,
        log_id: Uuid,
    ) -> Result<Option<maintenance_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(maintenance_log::Entity::find_by_id(log_id).one(db).await?)
    }

    /// Lists logs with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_logs(
        &self,
        page: u64,
        limit: u64,
        filter: MaintenanceFilter,
    ) -> Result<(Vec<maintenance_log::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = maintenance_log::Entity::find();

        if let Some(asset_id) = filter.asset_id {
            query = query.filter(maintenance_log::Column::AssetId.eq(asset_id));
        }
        if let Some(status_filter) = filter.status {
            match status_filter.parse::<maintenance_log::MaintenanceStatus>() {
                Ok(status) => query = query.filter(maintenance_log::Column::Status.eq(status)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(maintenance_log::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let logs = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((logs, total))
    }

    async fn require_log(&self, log_id: Uuid) -> Result<maintenance_log::Model, ServiceError> {
        let db = &*self.db_pool;
        maintenance_log::Entity::find_by_id(log_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Maintenance log {} not found", log_id)))
    }
}

/// Return the asset to Available when its last open maintenance log closes.
async fn release_asset_if_idle(
    txn: &DatabaseTransaction,
    asset_id: Uuid,
) -> Result<(), ServiceError> {
    let open_logs = maintenance_log::Entity::find()
        .filter(maintenance_log::Column::AssetId.eq(asset_id))
        .filter(maintenance_log::Column::Status.is_in([
            maintenance_log::MaintenanceStatus::Scheduled,
            maintenance_log::MaintenanceStatus::InProgress,
        ]))
        .count(txn)
        .await?;

    if open_logs > 0 {
        return Ok(());
    }

    let asset_model = asset::Entity::find_by_id(asset_id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", asset_id)))?;

    if asset_model.status == asset::AssetStatus::InMaintenance {
        let mut active: asset::ActiveModel = asset_model.into();
        active.status = Set(asset::AssetStatus::Available);
        active.update(txn).await?;
    }

    Ok(())
}
