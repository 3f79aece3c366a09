//! Domain events reflecting operator-visible mutations.
//!
//! Every such change emits a [`SiteEvent`] through the [`super::EventBus`].
//! Events are forwarded to admin console WebSocket subscribers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::showcase::ReviewStatus;

/// Coarse event channel an admin client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Contact-form submissions.
    Contacts,
    /// Newsletter sign-ups.
    Subscribers,
    /// Review submissions and moderation.
    Reviews,
    /// Blog generation.
    Blog,
    /// Site-content indexing.
    SiteContent,
}

impl Topic {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Subscribers => "subscribers",
            Self::Reviews => "reviews",
            Self::Blog => "blog",
            Self::SiteContent => "site_content",
        }
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contacts" => Ok(Self::Contacts),
            "subscribers" => Ok(Self::Subscribers),
            "reviews" => Ok(Self::Reviews),
            "blog" => Ok(Self::Blog),
            "site_content" => Ok(Self::SiteContent),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain event emitted after a mutation operators care about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SiteEvent {
    /// A contact form was submitted.
    ContactReceived {
        /// New contact row.
        contact_id: Uuid,
        /// Submitter's name.
        name: String,
        /// Service asked about.
        service_interest: Option<String>,
        /// Submission time.
        timestamp: DateTime<Utc>,
    },

    /// Someone (re-)joined the newsletter.
    SubscriberAdded {
        /// Subscriber row.
        subscriber_id: Uuid,
        /// Subscribed address.
        email: String,
        /// Sign-up time.
        timestamp: DateTime<Utc>,
    },

    /// A customer submitted a review for moderation.
    ReviewSubmitted {
        /// Review row.
        review_id: Uuid,
        /// Star rating.
        rating: i32,
        /// Submission time.
        timestamp: DateTime<Utc>,
    },

    /// A review was approved or rejected.
    ReviewModerated {
        /// Review row.
        review_id: Uuid,
        /// Resulting status.
        status: ReviewStatus,
        /// Moderation time.
        timestamp: DateTime<Utc>,
    },

    /// The generator produced a blog post.
    BlogPostGenerated {
        /// New post row.
        post_id: Uuid,
        /// Post title.
        title: String,
        /// Whether the post went live immediately.
        published: bool,
        /// Generation time.
        timestamp: DateTime<Utc>,
    },

    /// The site-content index was rebuilt.
    SiteContentIndexed {
        /// Pages written.
        indexed: usize,
        /// Pages that fell back to placeholder summaries.
        fallbacks: usize,
        /// Completion time.
        timestamp: DateTime<Utc>,
    },
}

impl SiteEvent {
    /// Returns the topic this event is published on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::ContactReceived { .. } => Topic::Contacts,
            Self::SubscriberAdded { .. } => Topic::Subscribers,
            Self::ReviewSubmitted { .. } | Self::ReviewModerated { .. } => Topic::Reviews,
            Self::BlogPostGenerated { .. } => Topic::Blog,
            Self::SiteContentIndexed { .. } => Topic::SiteContent,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ContactReceived { .. } => "contact_received",
            Self::SubscriberAdded { .. } => "subscriber_added",
            Self::ReviewSubmitted { .. } => "review_submitted",
            Self::ReviewModerated { .. } => "review_moderated",
            Self::BlogPostGenerated { .. } => "blog_post_generated",
            Self::SiteContentIndexed { .. } => "site_content_indexed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_is_a_review_topic() {
        let event = SiteEvent::ReviewModerated {
            review_id: Uuid::new_v4(),
            status: ReviewStatus::Approved,
            timestamp: Utc::now(),
        };
        assert_eq!(event.topic(), Topic::Reviews);
        assert_eq!(event.event_type_str(), "review_moderated");
    }

    #[test]
    fn contact_event_serializes_with_tag() {
        let event = SiteEvent::ContactReceived {
            contact_id: Uuid::new_v4(),
            name: "Aino".to_string(),
            service_interest: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"contact_received\""));
        assert!(json.contains("Aino"));
    }

    #[test]
    fn topics_round_trip_through_wire_names() {
        for topic in [
            Topic::Contacts,
            Topic::Subscribers,
            Topic::Reviews,
            Topic::Blog,
            Topic::SiteContent,
        ] {
            assert_eq!(topic.as_str().parse::<Topic>(), Ok(topic));
        }
        assert!("weather".parse::<Topic>().is_err());
    }
}
