use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Domain events emitted by the services.
///
/// Events are fire-and-forget: a failed send never fails the operation that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    // Asset events
    AssetCreated(Uuid),
    AssetUpdated(Uuid),
    AssetRetired(Uuid),
    AssetAssigned {
        asset_id: Uuid,
        holder_id: Uuid,
        assignment_id: Uuid,
    },
    AssetReturned {
        asset_id: Uuid,
        assignment_id: Uuid,
    },

    // Maintenance events
    MaintenanceScheduled {
        asset_id: Uuid,
        log_id: Uuid,
    },
    MaintenanceStarted(Uuid),
    MaintenanceCompleted {
        asset_id: Uuid,
        log_id: Uuid,
    },
    MaintenanceCanceled(Uuid),

    // Shipment events
    ShipmentCreated(Uuid),
    ShipmentDispatched(Uuid),
    ShipmentDelivered(Uuid),
    ShipmentCancelled(Uuid),

    // Return request events
    ReturnRequested(Uuid),
    ReturnResolved {
        request_id: Uuid,
        approved: bool,
    },
    ReturnCompleted(Uuid),

    // Order events
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Account events
    UserRegistered(Uuid),
}

impl Event {
    /// Stable name used for logging and webhook payloads
    pub fn name(&self) -> &'static str {
        match self {
            Event::AssetCreated(_) => "asset_created",
            Event::AssetUpdated(_) => "asset_updated",
            Event::AssetRetired(_) => "asset_retired",
            Event::AssetAssigned { .. } => "asset_assigned",
            Event::AssetReturned { .. } => "asset_returned",
            Event::MaintenanceScheduled { .. } => "maintenance_scheduled",
            Event::MaintenanceStarted(_) => "maintenance_started",
            Event::MaintenanceCompleted { .. } => "maintenance_completed",
            Event::MaintenanceCanceled(_) => "maintenance_canceled",
            Event::ShipmentCreated(_) => "shipment_created",
            Event::ShipmentDispatched(_) => "shipment_dispatched",
            Event::ShipmentDelivered(_) => "shipment_delivered",
            Event::ShipmentCancelled(_) => "shipment_cancelled",
            Event::ReturnRequested(_) => "return_requested",
            Event::ReturnResolved { .. } => "return_resolved",
            Event::ReturnCompleted(_) => "return_completed",
            Event::OrderCreated(_) => "order_created",
            Event::OrderStatusChanged { .. } => "order_status_changed",
            Event::UserRegistered(_) => "user_registered",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Send an event, logging instead of propagating failure.
    /// Event delivery never fails the originating operation.
    pub async fn send_logged(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            error!("Event delivery failed: {}", err);
        }
    }
}

/// Background processor draining the event channel.
///
/// Every event is logged; when a webhook notifier is configured, events are
/// forwarded to the configured URL as signed JSON payloads.
pub async fn process_events(
    mut receiver: mpsc::Receiver<Event>,
    notifier: Option<crate::webhooks::WebhookNotifier>,
    webhook_url: Option<String>,
) {
    info!(
        webhook_enabled = notifier.is_some() && webhook_url.is_some(),
        "Event processor started"
    );

    while let Some(event) = receiver.recv().await {
        debug!(event = event.name(), "Processing event");

        if let (Some(notifier), Some(url)) = (&notifier, &webhook_url) {
            notifier.send_async(url.clone(), event.clone());
        }
    }

    info!("Event processor stopped (channel closed)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        let asset_id = Uuid::new_v4();
        sender.send(Event::AssetCreated(asset_id)).await.unwrap();

        match rx.recv().await {
            Some(Event::AssetCreated(id)) => assert_eq!(id, asset_id),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_logged_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or return an error to the caller
        sender.send_logged(Event::AssetRetired(Uuid::new_v4())).await;
    }

    #[test]
    fn event_payload_serialization_is_tagged() {
        let event = Event::OrderStatusChanged {
            order_id: Uuid::nil(),
            old_status: "Pending".into(),
            new_status: "Confirmed".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderStatusChanged"));
        assert!(json.contains("Confirmed"));
        assert_eq!(event.name(), "order_status_changed");
    }
}
