//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::auth::AdminSession;
use crate::domain::{SiteEvent, Topic};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<SiteEvent>,
    session: AdminSession,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();
    let expiry = tokio::time::sleep(until_expiry(session.expires_at, Utc::now()));
    tokio::pin!(expiry);
    tracing::debug!(user_id = %session.user_id, "ws connection opened");

    loop {
        tokio::select! {
            () = &mut expiry => {
                tracing::info!(user_id = %session.user_id, "ws session expired, closing");
                let _ = ws_tx
                    .send(Message::Close(Some(CloseFrame {
                        code: close_code::POLICY,
                        reason: "session expired".into(),
                    })))
                    .await;
                break;
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs);
                        if let Ok(json) = serde_json::to_string(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(site_event) => {
                        if subs.matches(site_event.topic()) {
                            let json = serde_json::to_string(&WsMessage::event(&site_event))
                                .unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(user_id = %session.user_id, "ws connection closed");
}

/// Time left on the session; zero once `expires_at` has passed.
fn until_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (expires_at - now).to_std().unwrap_or(Duration::ZERO)
}

/// Handles a text message from the client and returns the reply.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 404, "unknown command");
    }

    let command = match serde_json::from_value::<WsCommand>(msg.payload.clone()) {
        Ok(command) => command,
        Err(e) => {
            let known = msg
                .payload
                .get("command")
                .and_then(|v| v.as_str())
                .is_some_and(|name| WsCommand::NAMES.contains(&name));
            return if known {
                WsMessage::error(msg.id, 400, &format!("invalid command payload: {e}"))
            } else {
                WsMessage::error(msg.id, 404, "unknown command")
            };
        }
    };

    match command {
        WsCommand::Subscribe { topics } => {
            let (parsed, wildcard, ignored) = parse_topics(&topics);
            subs.subscribe(&parsed, wildcard);
            WsMessage::response(
                msg.id,
                json!({
                    "subscribed": subs.topic_names(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": ignored,
                }),
            )
        }
        WsCommand::Unsubscribe { topics } => {
            let (parsed, wildcard, ignored) = parse_topics(&topics);
            subs.unsubscribe(&parsed, wildcard);
            WsMessage::response(
                msg.id,
                json!({
                    "subscribed": subs.topic_names(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": ignored,
                }),
            )
        }
    }
}

/// Splits raw names into known topics, the wildcard flag and unknown names.
fn parse_topics(names: &[String]) -> (Vec<Topic>, bool, Vec<String>) {
    let mut topics = Vec::new();
    let mut wildcard = false;
    let mut ignored = Vec::new();
    for name in names {
        if name == "*" {
            wildcard = true;
        } else if let Ok(topic) = name.parse::<Topic>() {
            topics.push(topic);
        } else {
            ignored.push(name.clone());
        }
    }
    (topics, wildcard, ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(reply: &WsMessage) -> Option<u64> {
        reply.payload.get("code").and_then(serde_json::Value::as_u64)
    }

    #[test]
    fn expiry_delay_is_never_negative() {
        let now = Utc::now();
        assert_eq!(
            until_expiry(now + chrono::Duration::seconds(90), now),
            Duration::from_secs(90)
        );
        assert_eq!(until_expiry(now - chrono::Duration::seconds(5), now), Duration::ZERO);
    }

    #[test]
    fn malformed_json_is_400() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message("{not json", &mut subs);
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(code(&reply), Some(400));
    }

    #[test]
    fn unknown_command_is_404() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message(
            r#"{"id":"1","type":"command","payload":{"command":"publish"}}"#,
            &mut subs,
        );
        assert_eq!(code(&reply), Some(404));
        assert_eq!(reply.id, "1");
    }

    #[test]
    fn subscribe_reports_unknown_topics() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message(
            r#"{"id":"7","type":"command","payload":{"command":"subscribe","topics":["reviews","weather"]}}"#,
            &mut subs,
        );
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert!(subs.matches(Topic::Reviews));
        assert_eq!(
            reply.payload.get("ignored"),
            Some(&serde_json::json!(["weather"]))
        );
    }

    #[test]
    fn subscribe_without_topics_is_400() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message(
            r#"{"id":"2","type":"command","payload":{"command":"subscribe"}}"#,
            &mut subs,
        );
        assert_eq!(code(&reply), Some(400));
    }
}
