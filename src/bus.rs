//! Event bus for update notifications and controller observability
//!
//! Uses tokio::sync::broadcast for pub/sub. The entity layer publishes
//! `SourcesUpdated` when its model changes; controllers publish what they
//! did so other surfaces can follow along.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Backend tag the entity layer attaches to source-list updates. Updates
/// tagged with any other backend do not concern the selection core.
pub const SOURCE_LIST_BACKEND: &str = "avrenderer";

/// Events published on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BusEvent {
    /// The upstream model changed. `backend: None` means untargeted; a tag
    /// names which backend's data moved.
    SourcesUpdated { backend: Option<String> },

    /// A controller activated a source on a renderer.
    SourceSelected { resource: String, source_id: String },

    /// A standby was issued; `all` marks the broadcast variant.
    StandbyIssued { resource: String, all: bool },
}

/// Event bus handle for publishing and subscribing
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: BusEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared event bus wrapped in Arc for thread-safe sharing
pub type SharedBus = Arc<EventBus>;

/// Create a new shared event bus with default capacity
pub fn create_bus() -> SharedBus {
    Arc::new(EventBus::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pubsub_delivers_to_subscriber() {
        let bus = create_bus();
        let mut rx = bus.subscribe();

        bus.publish(BusEvent::SourcesUpdated {
            backend: Some(SOURCE_LIST_BACKEND.to_string()),
        });

        match rx.recv().await.unwrap() {
            BusEvent::SourcesUpdated { backend } => {
                assert_eq!(backend.as_deref(), Some(SOURCE_LIST_BACKEND));
            }
            other => panic!("wrong event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive() {
        let bus = create_bus();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BusEvent::SourcesUpdated { backend: None });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            BusEvent::SourcesUpdated { backend: None }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            BusEvent::SourcesUpdated { backend: None }
        ));
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new(8);
        bus.publish(BusEvent::StandbyIssued {
            resource: "renderer/living".to_string(),
            all: false,
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
