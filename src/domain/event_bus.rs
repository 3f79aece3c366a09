//! Broadcast channel for domain events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every
//! operator-visible mutation publishes a [`SiteEvent`] through the bus, and
//! admin WebSocket connections subscribe to receive filtered events.

use tokio::sync::broadcast;

use super::SiteEvent;

/// Broadcast bus for [`SiteEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SiteEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: SiteEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn make_event(subscriber_id: Uuid) -> SiteEvent {
        SiteEvent::SubscriberAdded {
            subscriber_id,
            email: "sauna@example.fi".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(make_event(Uuid::new_v4())), 0);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let id = Uuid::new_v4();
        assert_eq!(bus.publish(make_event(id)), 2);

        let Ok(SiteEvent::SubscriberAdded { subscriber_id: a, .. }) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(SiteEvent::SubscriberAdded { subscriber_id: b, .. }) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(a, id);
        assert_eq!(b, id);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(16);
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);
        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
