use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Maintenance type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MaintenanceType {
    #[sea_orm(string_value = "Preventive")]
    Preventive,
    #[sea_orm(string_value = "Repair")]
    Repair,
    #[sea_orm(string_value = "Inspection")]
    Inspection,
    #[sea_orm(string_value = "Calibration")]
    Calibration,
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceType::Preventive => write!(f, "Preventive"),
            MaintenanceType::Repair => write!(f, "Repair"),
            MaintenanceType::Inspection => write!(f, "Inspection"),
            MaintenanceType::Calibration => write!(f, "Calibration"),
        }
    }
}

impl FromStr for MaintenanceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "preventive" => Ok(MaintenanceType::Preventive),
            "repair" => Ok(MaintenanceType::Repair),
            "inspection" => Ok(MaintenanceType::Inspection),
            "calibration" => Ok(MaintenanceType::Calibration),
            other => Err(format!("Unknown maintenance type '{}'", other)),
        }
    }
}

/// Maintenance status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MaintenanceStatus {
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    #[sea_orm(string_value = "InProgress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Canceled")]
    Canceled,
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceStatus::Scheduled => write!(f, "Scheduled"),
            MaintenanceStatus::InProgress => write!(f, "In Progress"),
            MaintenanceStatus::Completed => write!(f, "Completed"),
            MaintenanceStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "scheduled" => Ok(MaintenanceStatus::Scheduled),
            "inprogress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            "canceled" | "cancelled" => Ok(MaintenanceStatus::Canceled),
            other => Err(format!("Unknown maintenance status '{}'", other)),
        }
    }
}

impl MaintenanceStatus {
    /// A log that still occupies the asset
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Scheduled | MaintenanceStatus::InProgress
        )
    }
}

/// Custom error type for maintenance state transitions
#[derive(Error, Debug)]
pub enum MaintenanceError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Service record for an asset
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "maintenance_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub asset_id: Uuid,

    pub maintenance_type: MaintenanceType,

    pub status: MaintenanceStatus,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,

    /// Technician or vendor who performed the work
    pub performed_by: Option<String>,

    pub cost: Option<Decimal>,

    pub scheduled_for: Option<DateTime<Utc>>,

    pub started_at: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::Id",
        on_delete = "Cascade"
    )]
    Asset,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
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
    pub fn check_transition(&self, new_status: MaintenanceStatus) -> Result<(), MaintenanceError> {
        match (self.status, new_status) {
            (MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress) => Ok(()),
            (MaintenanceStatus::Scheduled, MaintenanceStatus::Canceled) => Ok(()),
            (MaintenanceStatus::InProgress, MaintenanceStatus::Completed) => Ok(()),
            (MaintenanceStatus::InProgress, MaintenanceStatus::Canceled) => Ok(()),
            (current, new) => Err(MaintenanceError::InvalidOperation(format!(
                "Invalid maintenance transition from {} to {}",
                current, new
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(status: MaintenanceStatus) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            maintenance_type: MaintenanceType::Repair,
            status,
            description: "Replace battery".into(),
            performed_by: None,
            cost: None,
            scheduled_for: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn scheduled_can_start_or_cancel_only() {
        let scheduled = log(MaintenanceStatus::Scheduled);
        assert!(scheduled
            .check_transition(MaintenanceStatus::InProgress)
            .is_ok());
        assert!(scheduled
            .check_transition(MaintenanceStatus::Canceled)
            .is_ok());
        assert!(scheduled
            .check_transition(MaintenanceStatus::Completed)
            .is_err());
    }

    #[test]
    fn completed_is_terminal() {
        let completed = log(MaintenanceStatus::Completed);
        assert!(completed
            .check_transition(MaintenanceStatus::InProgress)
            .is_err());
        assert!(completed
            .check_transition(MaintenanceStatus::Canceled)
            .is_err());
    }
}
