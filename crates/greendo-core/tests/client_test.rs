#![allow(clippy::unwrap_used)]
// End-to-end tests for `Client` against a wiremock REST API and a local
// websocket relay.

use futures_util::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use greendo_core::{Client, ClientConfig, CoreError, DoorStatus};

// ── Helpers ─────────────────────────────────────────────────────────

/// One-connection relay answering each inbound message with the next reply.
async fn spawn_relay(replies: Vec<Value>) -> (Url, JoinHandle<Vec<Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let mut received = Vec::new();
        let mut script = replies.into_iter();

        while let Some(Ok(msg)) = ws.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            received.push(serde_json::from_str(text.as_str()).unwrap());
            if let Some(reply) = script.next() {
                ws.send(Message::text(reply.to_string())).await.unwrap();
            }
        }
        received
    });

    (Url::parse(&format!("ws://{addr}/api/wsrpc")).unwrap(), handle)
}

fn config(server: &MockServer, relay: Url) -> ClientConfig {
    let api = Url::parse(&format!("{}/api", server.uri())).unwrap();
    ClientConfig::new("me@example.com", SecretString::from("hunter2".to_string()))
        .unwrap()
        .with_endpoints(api, relay)
}

fn unused_relay() -> Url {
    Url::parse("ws://127.0.0.1:9/api/wsrpc").unwrap()
}

fn authorized() -> Value {
    json!({ "jsonrpc": "2.0", "id": 3, "params": { "authorized": true } })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "auth": { "apiKey": "key-123" }, "varName": "me@example.com" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_devices(server: &MockServer, ids: &[&str]) {
    let list: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "varName": id, "name": format!("Opener {id}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": list })))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, attributes: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/devices/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "varName": id, "attributes": attributes }]
        })))
        .mount(server)
        .await;
}

async fn mount_logout(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "result": "OK" })))
        .expect(times)
        .mount(server)
        .await;
}

fn opener_attributes() -> Value {
    json!({
        "masterUnit": { "timeZoneOffset": { "value": -5 } },
        "garageDoor_7": {
            "moduleId": { "value": 5 },
            "portId": { "value": 7 },
            "doorState": { "value": 0 },
            "maxDoorPosition": { "value": 48 }
        },
        "garageLight_7": { "moduleId": { "value": 3 }, "portId": { "value": 7 } }
    })
}

// ── Lifecycle tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_send_and_close() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_detail(&server, "gdo-a", opener_attributes()).await;
    mount_logout(&server, 200, 1).await;
    let (relay_url, relay) = spawn_relay(vec![authorized(), json!({ "result": "ok" })]).await;

    let mut client = Client::connect(config(&server, relay_url)).await.unwrap();

    assert_eq!(client.devices().len(), 1);
    assert_eq!(client.master_device_id(), "gdo-a");
    assert_eq!(client.tz_offset(), Some(-5));
    assert_eq!(client.session().data()["varName"], "me@example.com");

    let device = client.device("gdo-a").unwrap();
    assert_eq!(device.name(), Some("Opener gdo-a"));
    assert_eq!(device.door().unwrap().door_status(), Some(DoorStatus::Closed));

    let command = device.cmd_open().unwrap();
    let reply = client.send_command(&command).await.unwrap();
    assert_eq!(reply, json!({ "result": "ok" }));

    client.close().await.unwrap();

    let received = relay.await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["method"], "srvWebSocketAuth");
    assert_eq!(received[0]["params"]["apiKey"], "key-123");
    assert_eq!(received[1], serde_json::to_value(&command).unwrap());
}

#[tokio::test]
async fn test_refresh_devices_picks_up_new_state() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_logout(&server, 200, 1).await;

    // First detail fetch reports the door closed, later ones open.
    let mut open = opener_attributes();
    open["garageDoor_7"]["doorState"] = json!({ "value": 1 });
    Mock::given(method("GET"))
        .and(path("/api/devices/gdo-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "attributes": opener_attributes() }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_detail(&server, "gdo-a", open).await;

    let (relay_url, _relay) = spawn_relay(vec![authorized()]).await;
    let mut client = Client::connect(config(&server, relay_url)).await.unwrap();
    let status = |c: &Client| c.device("gdo-a").and_then(|d| d.door()).and_then(|d| d.door_status());
    assert_eq!(status(&client), Some(DoorStatus::Closed));

    client.refresh_devices().await.unwrap();
    assert_eq!(status(&client), Some(DoorStatus::Open));

    client.close().await.unwrap();
}

// ── Construction failures ───────────────────────────────────────────

#[tokio::test]
async fn test_login_failure_does_not_log_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_logout(&server, 200, 0).await;

    let err = Client::connect(config(&server, unused_relay())).await.err().unwrap();

    assert!(err.is_auth_error(), "got: {err:?}");
    assert_eq!(err.response().map(|r| r.status), Some(401));
}

#[tokio::test]
async fn test_missing_master_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_detail(&server, "gdo-a", json!({ "garageDoor_7": {} })).await;
    mount_logout(&server, 200, 1).await;

    let err = Client::connect(config(&server, unused_relay())).await.err().unwrap();

    assert!(matches!(err, CoreError::MasterUnitNotFound), "got: {err:?}");
}

#[tokio::test]
async fn test_detail_failure_names_device_and_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a", "gdo-b"]).await;
    mount_detail(&server, "gdo-a", opener_attributes()).await;
    Mock::given(method("GET"))
        .and(path("/api/devices/gdo-b"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_logout(&server, 200, 1).await;

    let err = Client::connect(config(&server, unused_relay())).await.err().unwrap();

    match err {
        CoreError::DeviceDiscovery {
            device, response, ..
        } => {
            assert_eq!(device.as_deref(), Some("gdo-b"));
            assert_eq!(response.unwrap().status, 500);
        }
        other => panic!("expected DeviceDiscovery, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_socket_auth_rejected_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_detail(&server, "gdo-a", opener_attributes()).await;
    mount_logout(&server, 200, 1).await;
    let (relay_url, relay) = spawn_relay(vec![json!({ "params": { "authorized": false } })]).await;

    let err = Client::connect(config(&server, relay_url)).await.err().unwrap();

    assert!(err.is_auth_error(), "got: {err:?}");
    assert!(err.to_string().contains("socket not authorized"));
    // Relay task only ends once the client closed the socket.
    assert_eq!(relay.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_cleanup_logout_keeps_original_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_detail(&server, "gdo-a", json!({})).await;
    mount_logout(&server, 500, 1).await;

    let err = Client::connect(config(&server, unused_relay())).await.err().unwrap();

    assert!(matches!(err, CoreError::MasterUnitNotFound), "got: {err:?}");
}

// ── Close ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_close_reports_logout_failure() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_devices(&server, &["gdo-a"]).await;
    mount_detail(&server, "gdo-a", opener_attributes()).await;
    mount_logout(&server, 500, 1).await;
    let (relay_url, _relay) = spawn_relay(vec![authorized()]).await;

    let client = Client::connect(config(&server, relay_url)).await.unwrap();
    let err = client.close().await.unwrap_err();

    match err {
        CoreError::Close { socket, logout } => {
            assert!(socket.is_none());
            let logout = logout.unwrap();
            assert!(matches!(*logout, CoreError::LogoutFailed { .. }), "got: {logout:?}");
            assert_eq!(logout.response().map(|r| r.status), Some(500));
        }
        other => panic!("expected Close, got: {other:?}"),
    }
}
