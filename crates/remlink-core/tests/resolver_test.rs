#![allow(clippy::unwrap_used)]
// End-to-end resolution tests: a scripted WebSocket peer serves the
// entity registry, wiremock serves the state snapshot.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use remlink_api::{RestClient, RpcSession};
use remlink_core::{CoreError, resolve_devices};

/// Spawn a one-connection peer that handshakes, answers the registry
/// request with `registry`, then drains until close.
async fn spawn_registry_peer(registry: Value) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        ws.send(Message::text(json!({"type": "auth_required"}).to_string()))
            .await
            .unwrap();
        let _auth = ws.next().await.unwrap().unwrap();
        ws.send(Message::text(json!({"type": "auth_ok"}).to_string()))
            .await
            .unwrap();

        let request = match ws.next().await.unwrap().unwrap() {
            Message::Text(text) => serde_json::from_str::<Value>(text.as_str()).unwrap(),
            other => panic!("expected text frame, got: {other:?}"),
        };
        assert_eq!(request["type"], "config/entity_registry/list");

        let response = json!({
            "type": "result",
            "id": request["id"],
            "success": true,
            "result": registry,
        });
        ws.send(Message::text(response.to_string())).await.unwrap();

        while ws.next().await.is_some() {}
    });

    Url::parse(&format!("ws://{addr}")).unwrap()
}

async fn connect(ws_url: &Url) -> RpcSession {
    let token = SecretString::from("test-token".to_owned());
    RpcSession::connect(ws_url, &token, Duration::from_secs(5))
        .await
        .unwrap()
}

fn rest_client(server: &MockServer) -> RestClient {
    RestClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("test-token".to_owned()),
    )
}

#[tokio::test]
async fn test_resolution_joins_both_sources() {
    let ws_url = spawn_registry_peer(json!([
        {"entity_id": "remote.living_room", "unique_id": "aa:bb:cc:dd:ee:ff", "name": "Living Room"},
        {"entity_id": "remote.stale", "unique_id": "11:22:33:44:55:66"},
        {"entity_id": "light.kitchen"}
    ]))
    .await;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"entity_id": "remote.living_room", "state": "off",
             "attributes": {"supported_features": 3}},
            {"entity_id": "light.kitchen", "state": "on", "attributes": {}}
        ])))
        .mount(&server)
        .await;

    let mut session = connect(&ws_url).await;
    let records = resolve_devices(&mut session, &rest_client(&server))
        .await
        .unwrap();
    session.close().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entity_id, "remote.living_room");
    assert_eq!(records[0].display_name, "Living Room");
    assert_eq!(
        records[0].hardware_id.as_ref().map(|id| id.as_str()),
        Some("AABBCCDDEEFF")
    );
}

#[tokio::test]
async fn test_snapshot_failure_fails_whole_pass() {
    let ws_url = spawn_registry_peer(json!([
        {"entity_id": "remote.living_room", "unique_id": "aa:bb:cc:dd:ee:ff"}
    ]))
    .await;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = connect(&ws_url).await;
    let result = resolve_devices(&mut session, &rest_client(&server)).await;

    match result {
        Err(CoreError::Resolution { operation, .. }) => {
            assert_eq!(operation, "state snapshot");
        }
        other => panic!("expected Resolution error, got: {other:?}"),
    }
}
