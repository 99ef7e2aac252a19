use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Shipping carrier enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ShippingCarrier {
    #[sea_orm(string_value = "UPS")]
    Ups,
    #[sea_orm(string_value = "FedEx")]
    FedEx,
    #[sea_orm(string_value = "USPS")]
    Usps,
    #[sea_orm(string_value = "DHL")]
    Dhl,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl fmt::Display for ShippingCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShippingCarrier::Ups => write!(f, "UPS"),
            ShippingCarrier::FedEx => write!(f, "FedEx"),
            ShippingCarrier::Usps => write!(f, "USPS"),
            ShippingCarrier::Dhl => write!(f, "DHL"),
            ShippingCarrier::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for ShippingCarrier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "ups" => Ok(ShippingCarrier::Ups),
            "fedex" => Ok(ShippingCarrier::FedEx),
            "usps" => Ok(ShippingCarrier::Usps),
            "dhl" => Ok(ShippingCarrier::Dhl),
            "other" => Ok(ShippingCarrier::Other),
            other => Err(format!("Unknown carrier '{}'", other)),
        }
    }
}

/// Shipment status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ShipmentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "InTransit")]
    InTransit,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentStatus::Pending => write!(f, "Pending"),
            ShipmentStatus::InTransit => write!(f, "In Transit"),
            ShipmentStatus::Delivered => write!(f, "Delivered"),
            ShipmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "pending" => Ok(ShipmentStatus::Pending),
            "intransit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" | "canceled" => Ok(ShipmentStatus::Cancelled),
            other => Err(format!("Unknown shipment status '{}'", other)),
        }
    }
}

/// Custom error type for shipment operations
#[derive(Error, Debug)]
pub enum ShipmentError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Movement of a single asset between sites
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub asset_id: Uuid,

    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Tracking number must be between 1 and 100 characters"
    ))]
    pub tracking_number: String,

    pub carrier: ShippingCarrier,

    pub status: ShipmentStatus,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Origin must be between 1 and 255 characters"
    ))]
    pub origin: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Destination must be between 1 and 255 characters"
    ))]
    pub destination: String,

    pub recipient_name: String,

    pub shipped_at: Option<DateTime<Utc>>,

    pub estimated_delivery: Option<DateTime<Utc>>,

    pub delivered_at: Option<DateTime<Utc>>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
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
    pub fn check_transition(&self, new_status: ShipmentStatus) -> Result<(), ShipmentError> {
        match (self.status, new_status) {
            (ShipmentStatus::Pending, ShipmentStatus::InTransit) => Ok(()),
            (ShipmentStatus::Pending, ShipmentStatus::Cancelled) => Ok(()),
            (ShipmentStatus::InTransit, ShipmentStatus::Delivered) => Ok(()),
            (ShipmentStatus::InTransit, ShipmentStatus::Cancelled) => Ok(()),
            (current, new) => Err(ShipmentError::InvalidOperation(format!(
                "Invalid status transition from {} to {}",
                current, new
            ))),
        }
    }

    /// Generate tracking URL based on carrier and tracking number
    pub fn tracking_url(&self) -> Option<String> {
        let base_url = match self.carrier {
            ShippingCarrier::Ups => "https://www.ups.com/track?tracknum=",
            ShippingCarrier::FedEx => "https://www.fedex.com/apps/fedextrack/?tracknumbers=",
            ShippingCarrier::Usps => "https://tools.usps.com/go/TrackConfirmAction?tLabels=",
            ShippingCarrier::Dhl => {
                "https://www.dhl.com/us-en/home/tracking/tracking-express.html?submit=1&tracking-id="
            }
            ShippingCarrier::Other => return None,
        };

        Some(format!("{}{}", base_url, self.tracking_number))
    }

    /// Whether delivery happened (or is pending) past the estimate
    pub fn is_delivery_late(&self, now: DateTime<Utc>) -> bool {
        match (self.status, self.estimated_delivery) {
            (ShipmentStatus::Delivered, Some(estimated)) => self
                .delivered_at
                .map(|delivered| delivered > estimated)
                .unwrap_or(false),
            (ShipmentStatus::InTransit, Some(estimated)) => now > estimated,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn shipment(status: ShipmentStatus) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            tracking_number: "1Z999AA10123456784".into(),
            carrier: ShippingCarrier::Ups,
            status,
            origin: "Seattle HQ".into(),
            destination: "Portland office".into(),
            recipient_name: "Facilities".into(),
            shipped_at: None,
            estimated_delivery: None,
            delivered_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_can_dispatch_or_cancel() {
        let pending = shipment(ShipmentStatus::Pending);
        assert!(pending.check_transition(ShipmentStatus::InTransit).is_ok());
        assert!(pending.check_transition(ShipmentStatus::Cancelled).is_ok());
        assert!(pending.check_transition(ShipmentStatus::Delivered).is_err());
    }

    #[test]
    fn delivered_is_terminal() {
        let delivered = shipment(ShipmentStatus::Delivered);
        assert!(delivered
            .check_transition(ShipmentStatus::InTransit)
            .is_err());
        assert!(delivered
            .check_transition(ShipmentStatus::Cancelled)
            .is_err());
    }

    #[test]
    fn tracking_url_known_carriers_only() {
        let s = shipment(ShipmentStatus::Pending);
        assert!(s.tracking_url().unwrap().contains("1Z999AA10123456784"));

        let mut other = shipment(ShipmentStatus::Pending);
        other.carrier = ShippingCarrier::Other;
        assert!(other.tracking_url().is_none());
    }

    #[test]
    fn late_delivery_detection() {
        let now = Utc::now();
        let mut s = shipment(ShipmentStatus::InTransit);
        s.estimated_delivery = Some(now - Duration::days(1));
        assert!(s.is_delivery_late(now));

        s.status = ShipmentStatus::Delivered;
        s.delivered_at = Some(now - Duration::days(2));
        assert!(!s.is_delivery_late(now));
    }
}
