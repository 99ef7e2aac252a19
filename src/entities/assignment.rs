use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Assignment status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Returned")]
    Returned,
    #[sea_orm(string_value = "Overdue")]
    Overdue,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "Active"),
            AssignmentStatus::Returned => write!(f, "Returned"),
            AssignmentStatus::Overdue => write!(f, "Overdue"),
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "active" => Ok(AssignmentStatus::Active),
            "returned" => Ok(AssignmentStatus::Returned),
            "overdue" => Ok(AssignmentStatus::Overdue),
            other => Err(format!("Unknown assignment status '{}'", other)),
        }
    }
}

impl AssignmentStatus {
    /// An assignment still holding the asset (active or past due)
    pub fn is_open(&self) -> bool {
        matches!(self, AssignmentStatus::Active | AssignmentStatus::Overdue)
    }
}

/// A period during which an asset is held by a holder
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub asset_id: Uuid,

    pub holder_id: Uuid,

    pub status: AssignmentStatus,

    pub assigned_at: DateTime<Utc>,

    pub due_at: Option<DateTime<Utc>>,

    pub returned_at: Option<DateTime<Utc>>,

    /// Condition recorded when the asset was handed out
    #[validate(length(max = 500, message = "Condition notes cannot exceed 500 characters"))]
    pub condition_out: Option<String>,

    /// Condition recorded when the asset came back
    #[validate(length(max = 500, message = "Condition notes cannot exceed 500 characters"))]
    pub condition_in: Option<String>,

    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,

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

    #[sea_orm(
        belongs_to = "super::asset_holder::Entity",
        from = "Column::HolderId",
        to = "super::asset_holder::Column::Id",
        on_delete = "Cascade"
    )]
    Holder,

    #[sea_orm(has_many = "super::return_request::Entity")]
    ReturnRequests,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl Related<super::asset_holder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holder.def()
    }
}

impl Related<super::return_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReturnRequests.def()
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
    /// Whether the assignment is past its due date without having been returned
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open()
            && self
                .due_at
                .map(|due| due < now)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(status: AssignmentStatus, due_at: Option<DateTime<Utc>>) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            holder_id: Uuid::new_v4(),
            status,
            assigned_at: now,
            due_at,
            returned_at: None,
            condition_out: None,
            condition_in: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn past_due_requires_open_status_and_elapsed_due_date() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);
        let tomorrow = now + Duration::days(1);

        assert!(assignment(AssignmentStatus::Active, Some(yesterday)).is_past_due(now));
        assert!(!assignment(AssignmentStatus::Active, Some(tomorrow)).is_past_due(now));
        assert!(!assignment(AssignmentStatus::Active, None).is_past_due(now));
        assert!(!assignment(AssignmentStatus::Returned, Some(yesterday)).is_past_due(now));
    }
}
