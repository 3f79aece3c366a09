//! Per-connection subscription manager.
//!
//! Tracks which topics a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::BTreeSet;

use crate::domain::Topic;

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed topics. If `subscribe_all` is true, this set is ignored.
    topics: BTreeSet<Topic>,
    /// Whether the client subscribes to every topic (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set.
    pub fn subscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics. The wildcard clears every subscription.
    pub fn unsubscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
            self.topics.clear();
            return;
        }
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if events of `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.subscribe_all || self.topics.contains(&topic)
    }

    /// Explicitly subscribed topic names, in declaration order.
    #[must_use]
    pub fn topic_names(&self) -> Vec<&'static str> {
        self.topics.iter().map(|t| t.as_str()).collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
