use crate::{
    db::DbPool,
    entities::{asset, asset_holder, assignment},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Input for handing an asset to a holder
#[derive(Debug, Clone)]
pub struct AssignAssetInput {
    pub asset_id: Uuid,
    pub holder_id: Uuid,
    pub due_at: Option<DateTime<Utc>>,
    pub condition_out: Option<String>,
    pub notes: Option<String>,
}

/// Filters for assignment listings
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub asset_id: Option<Uuid>,
    pub holder_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Service for managing assignments
#[derive(Clone)]
pub struct AssignmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AssignmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Assigns an asset to a holder.
    ///
    /// Runs in a transaction: the asset must be Available, the holder must be
    /// active, and no other open assignment may exist for the asset. The
    /// asset moves Available -> Assigned atomically with the new record.
    #[instrument(skip(self, input))]
    pub async fn assign_asset(
        &self,
        input: AssignAssetInput,
    ) -> Result<assignment::Model, ServiceError> {
        let db = &*self.db_pool;

        let created = db
            .transaction::<_, assignment::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let asset_model = asset::Entity::find_by_id(input.asset_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Asset {} not found", input.asset_id))
                        })?;

                    if !asset_model.status.is_assignable() {
                        return Err(ServiceError::InvalidOperation(format!(
                            "Asset {} cannot be assigned while it is {}",
                            asset_model.asset_tag, asset_model.status
                        )));
                    }

                    let holder = asset_holder::Entity::find_by_id(input.holder_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Holder {} not found", input.holder_id))
                        })?;

                    if !holder.active {
                        return Err(ServiceError::InvalidOperation(format!(
                            "Holder '{}' is inactive and cannot receive assets",
                            holder.name
                        )));
                    }

                    let open = assignment::Entity::find()
                        .filter(assignment::Column::AssetId.eq(input.asset_id))
                        .filter(
                            assignment::Column::Status
                                .is_in([assignment::AssignmentStatus::Active, assignment::AssignmentStatus::Overdue]),
                        )
                        .one(txn)
                        .await?;
                    if open.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "Asset {} already has an open assignment",
                            asset_model.asset_tag
                        )));
                    }

                    let record = assignment::ActiveModel {
                        asset_id: Set(input.asset_id),
                        holder_id: Set(input.holder_id),
                        status: Set(assignment::AssignmentStatus::Active),
                        assigned_at: Set(Utc::now()),
                        due_at: Set(input.due_at),
                        condition_out: Set(input.condition_out),
                        notes: Set(input.notes),
                        ..Default::default()
                    };
                    let created = record.insert(txn).await?;

                    let mut asset_active: asset::ActiveModel = asset_model.into();
                    asset_active.status = Set(asset::AssetStatus::Assigned);
                    asset_active.update(txn).await?;

                    Ok(created)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::AssetAssigned {
                asset_id: created.asset_id,
                holder_id: created.holder_id,
                assignment_id: created.id,
            })
            .await;

        Ok(created)
    }

    /// Closes an assignment and releases the asset.
    #[instrument(skip(self))]
    pub async fn mark_returned(
        &self,
        assignment_id: Uuid,
        condition_in: Option<String>,
    ) -> Result<assignment::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, assignment::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    close_assignment(txn, assignment_id, condition_in).await
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::AssetReturned {
                asset_id: updated.asset_id,
                assignment_id: updated.id,
            })
            .await;

        Ok(updated)
    }

    /// Gets an assignment by ID
    #[instrument(skip(self))]
    pub async fn get_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Option<assignment::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(assignment::Entity::find_by_id(assignment_id).one(db).await?)
    }

    /// Lists assignments with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_assignments(
        &self,
        page: u64,
        limit: u64,
        filter: AssignmentFilter,
    ) -> Result<(Vec<assignment::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = assignment::Entity::find();

        if let Some(asset_id) = filter.asset_id {
            query = query.filter(assignment::Column::AssetId.eq(asset_id));
        }
        if let Some(holder_id) = filter.holder_id {
            query = query.filter(assignment::Column::HolderId.eq(holder_id));
        }
        if let Some(status_filter) = filter.status {
            match status_filter.parse::<assignment::AssignmentStatus>() {
                Ok(status) => query = query.filter(assignment::Column::Status.eq(status)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(assignment::Column::AssignedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let assignments = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((assignments, total))
    }

    /// Marks active assignments past their due date as Overdue.
    /// Returns the number of assignments flagged.
    #[instrument(skip(self))]
    pub async fn sweep_overdue(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let candidates = assignment::Entity::find()
            .filter(assignment::Column::Status.eq(assignment::AssignmentStatus::Active))
            .filter(assignment::Column::DueAt.lt(now))
            .all(db)
            .await?;

        let mut flagged = 0u64;
        for record in candidates {
            let mut active: assignment::ActiveModel = record.into();
            active.status = Set(assignment::AssignmentStatus::Overdue);
            active.update(db).await?;
            flagged += 1;
        }

        Ok(flagged)
    }
}

/// Shared with the return-request workflow: close an open assignment inside
/// an existing transaction and release the asset back to Available.
pub(crate) async fn close_assignment(
    txn: &sea_orm::DatabaseTransaction,
    assignment_id: Uuid,
    condition_in: Option<String>,
) -> Result<assignment::Model, ServiceError> {
    let record = assignment::Entity::find_by_id(assignment_id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Assignment {} not found", assignment_id)))?;

    if !record.status.is_open() {
        return Err(ServiceError::InvalidOperation(format!(
            "Assignment {} is not open (status {})",
            assignment_id, record.status
        )));
    }

    let asset_id = record.asset_id;

    let mut active: assignment::ActiveModel = record.into();
    active.status = Set(assignment::AssignmentStatus::Returned);
    active.returned_at = Set(Some(Utc::now()));
    if condition_in.is_some() {
        active.condition_in = Set(condition_in);
    }
    let updated = active.update(txn).await?;

    let asset_model = asset::Entity::find_by_id(asset_id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", asset_id)))?;

    let mut asset_active: asset::ActiveModel = asset_model.into();
    asset_active.status = Set(asset::AssetStatus::Available);
    asset_active.update(txn).await?;

    Ok(updated)
}

pub(crate) fn unwrap_txn_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        TransactionError::Transaction(e) => e,
    }
}
