use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Asset category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AssetCategory {
    #[sea_orm(string_value = "Laptop")]
    Laptop,
    #[sea_orm(string_value = "Monitor")]
    Monitor,
    #[sea_orm(string_value = "Phone")]
    Phone,
    #[sea_orm(string_value = "Tablet")]
    Tablet,
    #[sea_orm(string_value = "Vehicle")]
    Vehicle,
    #[sea_orm(string_value = "Tool")]
    Tool,
    #[sea_orm(string_value = "Furniture")]
    Furniture,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetCategory::Laptop => write!(f, "Laptop"),
            AssetCategory::Monitor => write!(f, "Monitor"),
            AssetCategory::Phone => write!(f, "Phone"),
            AssetCategory::Tablet => write!(f, "Tablet"),
            AssetCategory::Vehicle => write!(f, "Vehicle"),
            AssetCategory::Tool => write!(f, "Tool"),
            AssetCategory::Furniture => write!(f, "Furniture"),
            AssetCategory::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "laptop" => Ok(AssetCategory::Laptop),
            "monitor" => Ok(AssetCategory::Monitor),
            "phone" => Ok(AssetCategory::Phone),
            "tablet" => Ok(AssetCategory::Tablet),
            "vehicle" => Ok(AssetCategory::Vehicle),
            "tool" => Ok(AssetCategory::Tool),
            "furniture" => Ok(AssetCategory::Furniture),
            "other" => Ok(AssetCategory::Other),
            other => Err(format!("Unknown asset category '{}'", other)),
        }
    }
}

/// Asset lifecycle status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AssetStatus {
    #[sea_orm(string_value = "Available")]
    Available,
    #[sea_orm(string_value = "Assigned")]
    Assigned,
    #[sea_orm(string_value = "InMaintenance")]
    InMaintenance,
    #[sea_orm(string_value = "InTransit")]
    InTransit,
    #[sea_orm(string_value = "Retired")]
    Retired,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::Available => write!(f, "Available"),
            AssetStatus::Assigned => write!(f, "Assigned"),
            AssetStatus::InMaintenance => write!(f, "In Maintenance"),
            AssetStatus::InTransit => write!(f, "In Transit"),
            AssetStatus::Retired => write!(f, "Retired"),
        }
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "available" => Ok(AssetStatus::Available),
            "assigned" => Ok(AssetStatus::Assigned),
            "inmaintenance" => Ok(AssetStatus::InMaintenance),
            "intransit" => Ok(AssetStatus::InTransit),
            "retired" => Ok(AssetStatus::Retired),
            other => Err(format!("Unknown asset status '{}'", other)),
        }
    }
}

impl AssetStatus {
    /// Whether the asset can be handed to a holder from this state
    pub fn is_assignable(&self) -> bool {
        matches!(self, AssetStatus::Available)
    }
}

/// Asset entity model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization-wide tag printed on the physical label
    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 64,
        message = "Asset tag must be between 1 and 64 characters"
    ))]
    pub asset_tag: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Asset name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub category: AssetCategory,

    pub serial_number: Option<String>,

    pub status: AssetStatus,

    /// Site or room where the asset currently lives
    #[validate(length(max = 255, message = "Location cannot exceed 255 characters"))]
    pub location: Option<String>,

    pub purchase_date: Option<DateTime<Utc>>,

    pub purchase_price: Option<Decimal>,

    pub warranty_until: Option<DateTime<Utc>>,

    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Asset entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,

    #[sea_orm(has_many = "super::maintenance_log::Entity")]
    MaintenanceLogs,

    #[sea_orm(has_many = "super::shipment::Entity")]
    Shipments,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::maintenance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceLogs.def()
    }
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_loose_spellings() {
        assert_eq!(
            "in_maintenance".parse::<AssetStatus>().unwrap(),
            AssetStatus::InMaintenance
        );
        assert_eq!(
            "In Transit".parse::<AssetStatus>().unwrap(),
            AssetStatus::InTransit
        );
        assert!("broken".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn only_available_assets_are_assignable() {
        assert!(AssetStatus::Available.is_assignable());
        assert!(!AssetStatus::Assigned.is_assignable());
        assert!(!AssetStatus::InMaintenance.is_assignable());
        assert!(!AssetStatus::Retired.is_assignable());
    }
}
