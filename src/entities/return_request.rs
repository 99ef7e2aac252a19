use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Return request status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ReturnStatus {
    #[sea_orm(string_value = "Requested")]
    Requested,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnStatus::Requested => write!(f, "Requested"),
            ReturnStatus::Approved => write!(f, "Approved"),
            ReturnStatus::Rejected => write!(f, "Rejected"),
            ReturnStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for ReturnStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "requested" => Ok(ReturnStatus::Requested),
            "approved" => Ok(ReturnStatus::Approved),
            "rejected" => Ok(ReturnStatus::Rejected),
            "completed" => Ok(ReturnStatus::Completed),
            other => Err(format!("Unknown return status '{}'", other)),
        }
    }
}

/// Custom error type for return request transitions
#[derive(Error, Debug)]
pub enum ReturnRequestError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Request to take back an assigned asset
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "return_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub assignment_id: Uuid,

    /// Who filed the request (holder email or staff user id)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Requester must be between 1 and 255 characters"
    ))]
    pub requested_by: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Reason must be between 1 and 2000 characters"
    ))]
    pub reason: String,

    pub status: ReturnStatus,

    #[validate(length(max = 2000, message = "Resolution notes cannot exceed 2000 characters"))]
    pub resolution_notes: Option<String>,

    pub resolved_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
            active_model.created_at = Set(Utc::now());
        }
        active_model.updated_at = Set(Utc::now());

        Ok(active_model)
    }
}

impl Model {
    /// Validate a status transition before applying it
    pub fn check_transition(&self, new_status: ReturnStatus) -> Result<(), ReturnRequestError> {
        match (self.status, new_status) {
            (ReturnStatus::Requested, ReturnStatus::Approved) => Ok(()),
            (ReturnStatus::Requested, ReturnStatus::Rejected) => Ok(()),
            (ReturnStatus::Approved, ReturnStatus::Completed) => Ok(()),
            (current, new) => Err(ReturnRequestError::InvalidOperation(format!(
                "Invalid return request transition from {} to {}",
                current, new
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: ReturnStatus) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            assignment_id: Uuid::new_v4(),
            requested_by: "holder@example.com".into(),
            reason: "Leaving the team".into(),
            status,
            resolution_notes: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn requested_moves_to_approved_or_rejected() {
        let requested = request(ReturnStatus::Requested);
        assert!(requested.check_transition(ReturnStatus::Approved).is_ok());
        assert!(requested.check_transition(ReturnStatus::Rejected).is_ok());
        assert!(requested.check_transition(ReturnStatus::Completed).is_err());
    }

    #[test]
    fn only_approved_requests_complete() {
        assert!(request(ReturnStatus::Approved)
            .check_transition(ReturnStatus::Completed)
            .is_ok());
        assert!(request(ReturnStatus::Rejected)
            .check_transition(ReturnStatus::Completed)
            .is_err());
    }
}
