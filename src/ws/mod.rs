//! WebSocket layer: the admin live feed.
//!
//! The endpoint at `/ws` requires an admin session. Once connected, a
//! client subscribes to event topics and receives every matching
//! [`crate::domain::SiteEvent`] as it is published.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
