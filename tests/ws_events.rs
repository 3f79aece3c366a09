//! Live admin event stream over a real socket.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::TestApp;
use sauna_site::domain::{AppRole, NewContact};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

async fn serve(app: &TestApp) -> String {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("could not bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no address");
    };
    let router = app.app.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("ws://{addr}/ws")
}

async fn next_json<S>(stream: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(READ_TIMEOUT, stream.next()).await else {
            panic!("no message before timeout");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("server sent invalid JSON");
            };
            return value;
        }
    }
}

#[tokio::test]
async fn admin_receives_subscribed_events() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let url = serve(&app).await;

    let Ok((socket, _)) = connect_async(format!("{url}?access_token={token}")).await else {
        panic!("admin connection refused");
    };
    let (mut tx, mut rx) = socket.split();

    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "payload": { "command": "subscribe", "topics": ["contacts", "forecasts"] }
    });
    assert!(tx.send(Message::text(subscribe.to_string())).await.is_ok());

    let reply = next_json(&mut rx).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["id"], "sub-1");
    assert_eq!(reply["payload"]["subscribed"], json!(["contacts"]));
    assert_eq!(reply["payload"]["ignored"], json!(["forecasts"]));

    let submitted = app
        .state
        .leads
        .submit_contact(NewContact {
            name: "Aino".to_string(),
            email: "aino@example.com".to_string(),
            phone: None,
            service_interest: Some("cold-plunge".to_string()),
            message: "Cold plunge next to the sauna?".to_string(),
        })
        .await;
    let Ok(contact) = submitted else {
        panic!("contact submission failed");
    };

    let event = next_json(&mut rx).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "contact_received");
    assert_eq!(event["payload"]["contact_id"], contact.id.to_string());
}

#[tokio::test]
async fn unsubscribed_topics_are_not_forwarded() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let url = serve(&app).await;

    let Ok((socket, _)) = connect_async(format!("{url}?access_token={token}")).await else {
        panic!("admin connection refused");
    };
    let (mut tx, mut rx) = socket.split();

    let subscribe = json!({
        "id": "sub-reviews",
        "type": "command",
        "payload": { "command": "subscribe", "topics": ["reviews"] }
    });
    assert!(tx.send(Message::text(subscribe.to_string())).await.is_ok());
    let reply = next_json(&mut rx).await;
    assert_eq!(reply["payload"]["subscribed"], json!(["reviews"]));

    let res = app
        .post(
            "/api/v1/newsletter/subscribe",
            None,
            json!({ "email": "quiet@example.com" }),
        )
        .await;
    assert!(res.status.is_success());

    let ping = json!({ "id": "after", "type": "command", "payload": { "command": "reboot" } });
    assert!(tx.send(Message::text(ping.to_string())).await.is_ok());
    let reply = next_json(&mut rx).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["id"], "after");
    assert_eq!(reply["payload"]["code"], 404);
}

#[tokio::test]
async fn socket_closes_when_session_expires() {
    let app = TestApp::new();
    let token = app.token_expiring_in(Some(AppRole::Admin), 1).await;
    let url = serve(&app).await;

    let Ok((socket, _)) = connect_async(format!("{url}?access_token={token}")).await else {
        panic!("admin connection refused");
    };
    let (_tx, mut rx) = socket.split();

    let closed = tokio::time::timeout(READ_TIMEOUT, async {
        loop {
            match rx.next().await {
                Some(Ok(Message::Close(frame))) => return frame.map(|f| f.reason.as_str().to_string()),
                Some(Ok(_)) => {}
                _ => return None,
            }
        }
    })
    .await;
    let Ok(reason) = closed else {
        panic!("socket stayed open after the session expired");
    };
    assert_eq!(reason.as_deref(), Some("session expired"));
}

#[tokio::test]
async fn connections_without_admin_session_are_refused() {
    let app = TestApp::new();
    let url = serve(&app).await;

    assert!(connect_async(url.clone()).await.is_err());

    let user = app.token(None).await;
    assert!(connect_async(format!("{url}?access_token={user}")).await.is_err());
}
