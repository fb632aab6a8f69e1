// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live broadcast channel for domain events.
//!
//! The bus fans a [`DomainEvent`] out to every subscriber connected at
//! dispatch time. Delivery is at-least-once within the process and
//! fire-and-forget beyond it: a missing, slow, or disconnected subscriber
//! never fails the publish call or the ingestion write behind it. There is
//! no replay buffer -- subscribers joining after a publish never see it.
//!
//! Frames are serialized once at publish time, so every subscriber observes
//! the same bytes, and `tokio::sync::broadcast` preserves publication order,
//! which preserves per-machine ingestion order.

pub mod wire;

use floormon_core::DomainEvent;
use tokio::sync::broadcast;

/// Frames a slow subscriber may fall behind before it starts skipping.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast bus for the `production-monitoring` channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<String>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// Create a bus with an explicit per-subscriber backlog capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all frames published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Serialize and broadcast a domain event to all connected subscribers.
    ///
    /// Never fails: with no subscribers the frame is dropped, which is the
    /// correct live-only behavior.
    pub fn publish(&self, event: &DomainEvent) {
        let frame = wire::frame(event).to_string();
        tracing::debug!(
            event = event.name(),
            machine_id = event.machine_id(),
            subscribers = self.tx.receiver_count(),
            "broadcasting event"
        );
        let _ = self.tx.send(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floormon_core::types::MachineStatus;

    fn production_event(units: i64) -> DomainEvent {
        DomainEvent::ProductionRecorded {
            machine_id: 3,
            machine_name: "Mill 3".to_string(),
            units_produced: units,
            timestamp: "2024-01-01 10:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_frame() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(&production_event(5));

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "machine.data.updated");
        assert_eq!(value["data"]["unitsProduced"], 5);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        // Must not panic or error.
        bus.publish(&production_event(1));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn late_subscriber_sees_nothing_earlier() {
        let bus = EventBus::default();
        bus.publish(&production_event(1));

        let mut rx = bus.subscribe();
        bus.publish(&production_event(2));

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["data"]["unitsProduced"], 2, "no replay of older frames");
        assert!(rx.try_recv().is_err(), "only the post-subscribe frame arrives");
    }

    #[tokio::test]
    async fn frames_preserve_publication_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        for units in 1..=5 {
            bus.publish(&production_event(units));
        }
        bus.publish(&DomainEvent::StatusChanged {
            machine_id: 3,
            machine_name: "Mill 3".to_string(),
            status: MachineStatus::Idle,
            previous_status: MachineStatus::Running,
        });

        for expected in 1..=5 {
            let frame = rx.recv().await.unwrap();
            let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(value["data"]["unitsProduced"], expected);
        }
        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "machine.status.changed");
    }

    #[tokio::test]
    async fn every_connected_subscriber_gets_each_frame() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(&production_event(9));

        let f1 = rx1.recv().await.unwrap();
        let f2 = rx2.recv().await.unwrap();
        assert_eq!(f1, f2, "all subscribers observe identical bytes");
    }
}
