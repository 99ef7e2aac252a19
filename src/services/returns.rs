use crate::{
    db::DbPool,
    entities::{assignment, return_request},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::assignments::{close_assignment, unwrap_txn_error};

/// Input for submitting a return request
#[derive(Debug, Clone)]
pub struct SubmitReturnInput {
    pub assignment_id: Uuid,
    pub requested_by: String,
    pub reason: String,
}

/// Service for the return request workflow
#[derive(Clone)]
pub struct ReturnRequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReturnRequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Submits a return request for an open assignment
    #[instrument(skip(self, input))]
    pub async fn submit(
        &self,
        input: SubmitReturnInput,
    ) -> Result<return_request::Model, ServiceError> {
        let db = &*self.db_pool;

        let target = assignment::Entity::find_by_id(input.assignment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", input.assignment_id))
            })?;

        if !target.status.is_open() {
            return Err(ServiceError::InvalidOperation(format!(
                "Assignment {} is not open; nothing to return",
                input.assignment_id
            )));
        }

        let pending = return_request::Entity::find()
            .filter(return_request::Column::AssignmentId.eq(input.assignment_id))
            .filter(return_request::Column::Status.is_in([
                return_request::ReturnStatus::Requested,
                return_request::ReturnStatus::Approved,
            ]))
            .one(db)
            .await?;
        if pending.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Assignment {} already has an open return request",
                input.assignment_id
            )));
        }

        let record = return_request::ActiveModel {
            assignment_id: Set(input.assignment_id),
            requested_by: Set(input.requested_by),
            reason: Set(input.reason),
            status: Set(return_request::ReturnStatus::Requested),
            ..Default::default()
        };
        let created = record.insert(db).await?;

        self.event_sender
            .send_logged(Event::ReturnRequested(created.id))
            .await;

        Ok(created)
    }

    /// Approves a pending request
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        request_id: Uuid,
        resolution_notes: Option<String>,
    ) -> Result<return_request::Model, ServiceError> {
        let updated = self
            .resolve(request_id, return_request::ReturnStatus::Approved, resolution_notes)
            .await?;

        self.event_sender
            .send_logged(Event::ReturnResolved {
                request_id: updated.id,
                approved: true,
            })
            .await;

        Ok(updated)
    }

    /// Rejects a pending request
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        request_id: Uuid,
        resolution_notes: Option<String>,
    ) -> Result<return_request::Model, ServiceError> {
        let updated = self
            .resolve(request_id, return_request::ReturnStatus::Rejected, resolution_notes)
            .await?;

        self.event_sender
            .send_logged(Event::ReturnResolved {
                request_id: updated.id,
                approved: false,
            })
            .await;

        Ok(updated)
    }

    /// Completes an approved request: the underlying assignment closes and
    /// the asset returns to circulation, all in one transaction.
    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        request_id: Uuid,
        condition_in: Option<String>,
    ) -> Result<return_request::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, return_request::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = return_request::Entity::find_by_id(request_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Return request {} not found",
                                request_id
                            ))
                        })?;

                    record
                        .check_transition(return_request::ReturnStatus::Completed)
                        .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

                    close_assignment(txn, record.assignment_id, condition_in).await?;

                    let mut active: return_request::ActiveModel = record.into();
                    active.status = Set(return_request::ReturnStatus::Completed);
                    active.resolved_at = Set(Some(Utc::now()));
                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        self.event_sender
            .send_logged(Event::ReturnCompleted(updated.id))
            .await;

        Ok(updated)
    }

    /// Gets a request by ID
    #[instrument(skip(self))]
    pub async fn get_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<return_request::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(return_request::Entity::find_by_id(request_id).one(db).await?)
    }

    /// Lists requests with pagination and optional status filter
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        page: u64,
        limit: u64,
        status: Option<String>,
    ) -> Result<(Vec<return_request::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = return_request::Entity::find();

        if let Some(status_filter) = status {
            match status_filter.parse::<return_request::ReturnStatus>() {
                Ok(parsed) => query = query.filter(return_request::Column::Status.eq(parsed)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(return_request::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let requests = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((requests, total))
    }

    async fn resolve(
        &self,
        request_id: Uuid,
        new_status: return_request::ReturnStatus,
        resolution_notes: Option<String>,
    ) -> Result<return_request::Model, ServiceError> {
        let db = &*self.db_pool;
        let record = return_request::Entity::find_by_id(request_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Return request {} not found", request_id))
            })?;

        record
            .check_transition(new_status)
            .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;

        let mut active: return_request::ActiveModel = record.into();
        active.status = Set(new_status);
        if resolution_notes.is_some() {
            active.resolution_notes = Set(resolution_notes);
        }
        // Rejection is terminal; approval keeps resolved_at for completion
        if new_status == return_request::ReturnStatus::Rejected {
            active.resolved_at = Set(Some(Utc::now()));
        }

        Ok(active.update(db).await?)
    }
}
