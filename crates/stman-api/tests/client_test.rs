#![allow(clippy::unwrap_used)]
// Integration tests for `SyncthingClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use stman_api::{
    DeviceEdit, Error, FolderEdit, FolderType, NewDevice, NewFolder, PullOrder, SyncthingClient,
    TransportConfig, VersioningPolicy,
};

const DEVICE_A: &str = "MFZWI3D-BONSGYC-YLTMRWG-C43ENR5-QXGZDMM-FZWI3DP-BONSGYY-LTMRWAD";
const DEVICE_B: &str = "MRIW7OK-NETT3M4-N6SBWME-N25O76W-YJKVXPH-FUMQJ3S-P57B74J-GBITBAC";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SyncthingClient) {
    let server = MockServer::start().await;
    let client = SyncthingClient::new(
        Url::parse(&server.uri()).unwrap(),
        &SecretString::from("test-key"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn folder_json(devices: &[&str]) -> Value {
    json!({
        "id": "stmantest1",
        "label": "Test Folder",
        "path": "/tmp/stmantest1",
        "type": "sendreceive",
        "devices": devices
            .iter()
            .map(|d| json!({ "deviceID": d, "introducedBy": "" }))
            .collect::<Vec<_>>(),
        "rescanIntervalS": 3600,
        "fsWatcherEnabled": true,
        "order": "random",
        "ignorePerms": false,
        "versioning": { "type": "", "params": {}, "cleanupIntervalS": 3600 }
    })
}

/// Body of the single PUT the server received.
async fn put_body(server: &MockServer) -> Value {
    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("no PUT request received");
    serde_json::from_slice(&put.body).unwrap()
}

async fn mount_folder(server: &MockServer, devices: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/rest/config/folders/stmantest1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(devices)))
        .mount(server)
        .await;
}

async fn mount_folder_put(server: &MockServer, expected_calls: u64) {
    Mock::given(method("PUT"))
        .and(path("/rest/config/folders/stmantest1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/system/status"))
        .and(header("X-API-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "myID": DEVICE_A })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.system_status().await.unwrap();
    assert_eq!(status.my_id, DEVICE_A);
}

#[tokio::test]
async fn test_forbidden_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/config/devices"))
        .respond_with(ResponseTemplate::new(403).set_body_string("CSRF Error\n"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_unauthorized(), "expected 403, got: {err:?}");
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "CSRF Error");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_reason_phrase() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/system/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    match client.system_status().await.unwrap_err() {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Transport / decoding failures ───────────────────────────────────

#[tokio::test]
async fn test_malformed_json_is_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/config/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.list_folders().await;
    assert!(
        matches!(result, Err(Error::Protocol { ref body, .. }) if body.contains("not json")),
        "expected Protocol error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_daemon_is_connection_error() {
    // Bind and drop a server so the port is known to be closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client = SyncthingClient::from_reqwest(&uri, reqwest::Client::new()).unwrap();

    let result = client.system_status().await;
    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection error, got: {result:?}"
    );
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_keeps_extra_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/config/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "deviceID": DEVICE_A,
            "name": "laptop",
            "addresses": ["dynamic"],
            "compression": "metadata",
            "introducer": false,
            "paused": false,
            "autoAcceptFolders": true
        }])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "laptop");
    assert_eq!(devices[0].extra["autoAcceptFolders"], json!(true));
}

#[tokio::test]
async fn test_add_device_validates_then_posts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/svc/deviceid"))
        .and(query_param("id", DEVICE_B.to_lowercase()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": DEVICE_B })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/rest/config/devices/{DEVICE_B}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("No device with given ID"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/config/devices"))
        .and(body_partial_json(json!({
            "deviceID": DEVICE_B,
            "name": "desktop",
            "addresses": ["dynamic"],
            "introducer": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let id = client
        .add_device(NewDevice {
            device_id: DEVICE_B.to_lowercase(),
            name: "desktop".into(),
            addresses: vec!["dynamic".into()],
            introducer: true,
        })
        .await
        .unwrap();
    assert_eq!(id, DEVICE_B);
}

#[tokio::test]
async fn test_add_existing_device_is_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/svc/deviceid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": DEVICE_A })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/rest/config/devices/{DEVICE_A}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deviceID": DEVICE_A })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/config/devices"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .add_device(NewDevice {
            device_id: DEVICE_A.into(),
            name: String::new(),
            addresses: vec!["dynamic".into()],
            introducer: false,
        })
        .await;
    assert!(
        matches!(result, Err(Error::Conflict { kind: "Device", .. })),
        "expected Conflict, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_device_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/svc/deviceid"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "device ID invalid: incorrect length" })),
        )
        .mount(&server)
        .await;

    let result = client.validate_device_id("NOPE").await;
    assert!(
        matches!(result, Err(Error::InvalidDeviceId { ref reason, .. }) if reason.contains("incorrect length")),
        "expected InvalidDeviceId, got: {result:?}"
    );
}

#[tokio::test]
async fn test_edit_device_puts_full_object() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/rest/config/devices/{DEVICE_A}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deviceID": DEVICE_A,
            "name": "old",
            "addresses": ["dynamic", "localhost"],
            "compression": "metadata",
            "introducer": false,
            "maxSendKbps": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/rest/config/devices/{DEVICE_A}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .edit_device(
            DEVICE_A,
            &[
                DeviceEdit::Name("new".into()),
                DeviceEdit::RemoveAddress("localhost".into()),
                DeviceEdit::Introducer(true),
            ],
        )
        .await
        .unwrap();

    let body = put_body(&server).await;
    assert_eq!(body["name"], json!("new"));
    assert_eq!(body["addresses"], json!(["dynamic"]));
    assert_eq!(body["introducer"], json!(true));
    assert_eq!(body["maxSendKbps"], json!(0));
}

#[tokio::test]
async fn test_pause_single_device() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/system/pause"))
        .and(query_param("device", DEVICE_A))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.pause(Some(DEVICE_A)).await.unwrap();
}

// ── Folders ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_share_folder_appends_device() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A]).await;
    mount_folder_put(&server, 1).await;

    let folder = client.share_folder("stmantest1", DEVICE_B).await.unwrap();
    assert!(folder.is_shared_with(DEVICE_B));

    let body = put_body(&server).await;
    let ids: Vec<&str> = body["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["deviceID"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![DEVICE_A, DEVICE_B]);
    assert_eq!(body["fsWatcherEnabled"], json!(true));
}

#[tokio::test]
async fn test_share_folder_twice_writes_nothing() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A, DEVICE_B]).await;
    mount_folder_put(&server, 0).await;

    let result = client.share_folder("stmantest1", DEVICE_B).await;
    assert!(
        matches!(result, Err(Error::AlreadyShared { .. })),
        "expected AlreadyShared, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unshare_folder_removes_device() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A, DEVICE_B]).await;
    mount_folder_put(&server, 1).await;

    let folder = client.unshare_folder("stmantest1", DEVICE_B).await.unwrap();
    assert!(!folder.is_shared_with(DEVICE_B));
    assert!(folder.is_shared_with(DEVICE_A));
}

#[tokio::test]
async fn test_unshare_unknown_device_is_not_shared() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A]).await;
    mount_folder_put(&server, 0).await;

    let result = client.unshare_folder("stmantest1", DEVICE_B).await;
    assert!(
        matches!(result, Err(Error::NotShared { .. })),
        "expected NotShared, got: {result:?}"
    );
}

#[tokio::test]
async fn test_set_simple_versioning() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A]).await;
    mount_folder_put(&server, 1).await;

    client
        .set_versioning("stmantest1", &VersioningPolicy::Simple { keep: 15 })
        .await
        .unwrap();

    let body = put_body(&server).await;
    assert_eq!(body["versioning"]["type"], json!("simple"));
    assert_eq!(body["versioning"]["params"], json!({ "keep": "15" }));
    assert_eq!(body["versioning"]["cleanupIntervalS"], json!(3600));
}

#[tokio::test]
async fn test_edit_folder_applies_all_edits() {
    let (server, client) = setup().await;
    mount_folder(&server, &[DEVICE_A]).await;
    mount_folder_put(&server, 1).await;

    client
        .edit_folder(
            "stmantest1",
            &[
                FolderEdit::Label("Renamed".into()),
                FolderEdit::RescanInterval(40),
                FolderEdit::Order(PullOrder::OldestFirst),
                FolderEdit::Type(FolderType::SendOnly),
                FolderEdit::MinDiskFreePct(5.0),
            ],
        )
        .await
        .unwrap();

    let body = put_body(&server).await;
    assert_eq!(body["label"], json!("Renamed"));
    assert_eq!(body["rescanIntervalS"], json!(40));
    assert_eq!(body["order"], json!("oldestFirst"));
    assert_eq!(body["type"], json!("sendonly"));
    assert_eq!(body["minDiskFree"], json!({ "value": 5.0, "unit": "%" }));
}

#[tokio::test]
async fn test_add_folder_posts_when_id_free() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/config/folders/photos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/config/folders"))
        .and(body_partial_json(json!({
            "id": "photos",
            "label": "Photos",
            "path": "/data/photos",
            "rescanIntervalS": 60
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_folder(&NewFolder {
            id: "photos".into(),
            label: "Photos".into(),
            path: "/data/photos".into(),
            folder_type: None,
            rescan_interval_s: Some(60),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_folder_ids_are_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/config/folders/my%20docs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.remove_folder("my docs").await.unwrap();
}

#[tokio::test]
async fn test_folder_status_percent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/db/status"))
        .and(query_param("folder", "stmantest1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "globalBytes": 1000,
            "inSyncBytes": 995,
            "state": "idle"
        })))
        .mount(&server)
        .await;

    let status = client.folder_status("stmantest1").await.unwrap();
    assert_eq!(status.sync_percent(), 99);
    assert_eq!(status.state, "idle");
}
