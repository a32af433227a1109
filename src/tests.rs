//! End-to-end tests against a local mock cluster API.

use crate::client::{CancelToken, ClientConfig, ClusterClient, ClusterEndpoint};
use crate::error::ClusterError;
use crate::types::*;
use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server, ServerGuard};
use std::collections::BTreeMap;

const CID: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";

fn client_for(server: &ServerGuard) -> ClusterClient {
    let endpoint = ClusterEndpoint::new(&server.url()).unwrap();
    ClusterClient::new(endpoint).unwrap()
}

fn pin_body(cid: &str) -> String {
    serde_json::json!({
        "cid": {"/": cid},
        "type": 2,
        "allocations": ["peerA", "peerB"],
        "max_depth": -1,
        "reference": null,
        "replication_factor_min": -1,
        "replication_factor_max": -1,
        "name": "photos",
        "mode": "recursive",
        "shard_size": 0,
        "user_allocations": null,
        "expire_at": "0001-01-01T00:00:00Z",
        "metadata": {"owner": "alice"},
        "pin_update": null,
        "origins": [],
        "timestamp": "2024-03-01T12:00:00Z"
    })
    .to_string()
}

fn status_body(cid: &str) -> String {
    serde_json::json!({
        "cid": {"/": cid},
        "name": "photos",
        "peer_map": {
            "12D3KooWA": {
                "peername": "node-a",
                "ipfs_peer_id": "12D3KooWIpfsA",
                "status": "pinned",
                "timestamp": "2024-03-01T12:00:00Z",
                "error": ""
            },
            "12D3KooWB": {
                "peername": "node-b",
                "status": "pin_error",
                "timestamp": "2024-03-01T12:00:05+02:00",
                "error": "context deadline exceeded"
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_version() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/version")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(r#"{"version":"1.1.1"}"#)
        .create_async()
        .await;

    let version = client_for(&server)
        .version(&RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(version, "1.1.1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_info() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/id")
        .with_status(200)
        .with_body(
            r#"{"id":"12D3KooWA","peername":"node-a","version":"1.1.1","commit":"",
               "rpc_protocol_version":"/ipfscluster/1.0/rpc",
               "addresses":["/ip4/127.0.0.1/tcp/9096"],"cluster_peers":["12D3KooWA","12D3KooWB"],
               "ipfs":{"id":"12D3KooWIpfsA","addresses":[]}}"#,
        )
        .create_async()
        .await;

    let info = client_for(&server)
        .info(&RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(info.peer_name, "node-a");
    assert_eq!(info.cluster_peers.len(), 2);
    assert!(info.cluster_peers_addresses.is_empty());
    assert_eq!(info.ipfs.unwrap().id, "12D3KooWIpfsA");
}

#[tokio::test]
async fn test_add_file_accepts_bare_object() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::Any)
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex(r#"filename="hello.txt""#.into()))
        .with_status(200)
        .with_body(format!(r#"{{"name":"hello.txt","cid":{{"/":"{}"}},"size":13}}"#, CID))
        .create_async()
        .await;

    let added = client_for(&server)
        .add_file(
            FileWithName::new("hello.txt", "hello, world\n"),
            &AddParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(
        added,
        AddResponse {
            name: "hello.txt".into(),
            cid: CID.into(),
            size: 13,
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_file_accepts_single_element_array() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/add")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(r#"[{{"name":"hello.txt","cid":{{"/":"{}"}},"size":"13"}}]"#, CID))
        .create_async()
        .await;

    let added = client_for(&server)
        .add_file(FileWithName::new("hello.txt", "hello"), &AddParams::default())
        .await
        .unwrap();
    assert_eq!(added.cid, CID);
    assert_eq!(added.size, 13);
}

#[tokio::test]
async fn test_add_sends_options_as_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cid-version".into(), "1".into()),
            Matcher::UrlEncoded("raw-leaves".into(), "true".into()),
            Matcher::UrlEncoded("replication-min".into(), "2".into()),
            Matcher::UrlEncoded("name".into(), "my file".into()),
            Matcher::UrlEncoded("meta-owner".into(), "alice".into()),
        ]))
        .with_status(200)
        .with_body(format!(r#"{{"name":"a","cid":{{"/":"{}"}},"size":1}}"#, CID))
        .create_async()
        .await;

    let params = AddParams {
        cid_version: Some(1),
        raw_leaves: Some(true),
        replication_factor_min: Some(2),
        name: Some("my file".into()),
        metadata: Some(BTreeMap::from([("owner".to_string(), "alice".to_string())])),
        ..Default::default()
    };
    client_for(&server)
        .add_file(FileWithName::new("a", "x"), &params)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_data_reads_first_item_of_ndjson_stream() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::UrlEncoded("stream-channels".into(), "true".into()))
        .with_status(200)
        .with_body(format!(
            "{{\"name\":\"blob\",\"cid\":{{\"/\":\"{}\"}},\"size\":4}}\n{{\"name\":\"\",\"cid\":{{\"/\":\"bafyother\"}},\"size\":60}}\n",
            CID
        ))
        .create_async()
        .await;

    let params = AddParams {
        stream_channels: Some(true),
        ..Default::default()
    };
    let added = client_for(&server)
        .add_data(&b"data"[..], &params)
        .await
        .unwrap();
    assert_eq!(added.cid, CID);
    assert_eq!(added.size, 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_directory_preserves_order_and_forces_wrapping() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("stream-channels".into(), "false".into()),
            Matcher::UrlEncoded("wrap-with-directory".into(), "true".into()),
        ]))
        .match_body(Matcher::Regex(
            r#"(?s)filename="site/index.html".*filename="site/css/main.css""#.into(),
        ))
        .with_status(200)
        .with_body(
            r#"[
                {"name":"site/index.html","cid":{"/":"bafyindex"},"size":20},
                {"name":"site/css/main.css","cid":{"/":"bafycss"},"size":11},
                {"name":"site/css","cid":{"/":"bafycssdir"},"size":70},
                {"name":"site","cid":{"/":"bafysite"},"size":150}
            ]"#,
        )
        .create_async()
        .await;

    // Caller asks for streaming; directory uploads override it.
    let params = AddParams {
        stream_channels: Some(true),
        ..Default::default()
    };
    let items = client_for(&server)
        .add_directory(
            vec![
                FileWithName::new("site/index.html", "<h1>hi</h1>"),
                FileWithName::new("site/css/main.css", "h1{}"),
            ],
            &params,
        )
        .await
        .unwrap();

    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        ["site/index.html", "site/css/main.css", "site/css", "site"]
    );
    assert_eq!(items[3].cid, "bafysite");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_car_sends_car_format() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::UrlEncoded("format".into(), "car".into()))
        .match_body(Matcher::Regex("application/vnd.ipld.car".into()))
        .with_status(200)
        .with_body(format!(r#"[{{"name":"","cid":{{"/":"{}"}},"size":0}}]"#, CID))
        .create_async()
        .await;

    let added = client_for(&server)
        .add_car(
            FileWithName::new("archive.car", "CARv1 payload"),
            &AddParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(added.cid, CID);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pin_plain_cid() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("/pins/{}", CID).as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "photos".into()),
            Matcher::UrlEncoded("mode".into(), "recursive".into()),
            Matcher::UrlEncoded("expire-at".into(), "2030-01-02T03:04:05Z".into()),
        ]))
        .with_status(200)
        .with_body(pin_body(CID))
        .create_async()
        .await;

    let options = PinOptions {
        name: Some("photos".into()),
        mode: Some(PinMode::Recursive),
        expire_at: Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()),
        ..Default::default()
    };
    let pin = client_for(&server).pin(CID, &options).await.unwrap();

    assert_eq!(pin.cid, CID);
    assert_eq!(pin.name, "photos");
    assert_eq!(pin.allocations, ["peerA", "peerB"]);
    assert_eq!(pin.mode, Some(PinMode::Recursive));
    assert_eq!(pin.expire_at, None);
    assert_eq!(pin.metadata["owner"], "alice");
    assert!(pin.user_allocations.is_empty());
    assert_eq!(
        pin.timestamp,
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pin_rooted_path_has_single_prefix() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/pins/ipfs/bafyroot/docs")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(pin_body("bafydocs"))
        .create_async()
        .await;

    let pin = client_for(&server)
        .pin("/ipfs/bafyroot/docs", &PinOptions::default())
        .await
        .unwrap();
    assert_eq!(pin.cid, "bafydocs");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unpin_uses_delete() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", format!("/pins/{}", CID).as_str())
        .with_status(200)
        .with_body(pin_body(CID))
        .create_async()
        .await;

    let pin = client_for(&server)
        .unpin(CID, &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(pin.cid, CID);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pinls_with_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/allocations")
        .match_query(Matcher::UrlEncoded("filter".into(), "pin,meta-pin".into()))
        .with_status(200)
        .with_body(format!("[{},{}]", pin_body(CID), pin_body("bafysecond")))
        .create_async()
        .await;

    let options = PinlsOptions {
        filter: Some(vec![PinType::Data, PinType::Meta]),
        ..Default::default()
    };
    let pins = client_for(&server).pinls(&options).await.unwrap();
    let cids: Vec<_> = pins.iter().map(|p| p.cid.as_str()).collect();
    assert_eq!(cids, [CID, "bafysecond"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pinls_empty_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/allocations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let pins = client_for(&server)
        .pinls(&PinlsOptions::default())
        .await
        .unwrap();
    assert!(pins.is_empty());
}

#[tokio::test]
async fn test_status_peer_map() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("/pins/{}", CID).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(status_body(CID))
        .create_async()
        .await;

    let status = client_for(&server)
        .status(CID, &StatusOptions::default())
        .await
        .unwrap();

    assert_eq!(status.cid, CID);
    assert_eq!(status.name, "photos");
    assert_eq!(status.peer_map.len(), 2);

    let a = &status.peer_map["12D3KooWA"];
    assert_eq!(a.peer_name, "node-a");
    assert_eq!(a.status, TrackerStatus::Pinned);
    assert_eq!(a.ipfs_peer_id.as_deref(), Some("12D3KooWIpfsA"));
    assert_eq!(a.error.as_deref(), Some(""));

    let b = &status.peer_map["12D3KooWB"];
    assert!(b.status.is_error());
    assert_eq!(b.error.as_deref(), Some("context deadline exceeded"));
    assert_eq!(
        b.timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 5).unwrap()
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_without_peer_map() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("/pins/{}", CID).as_str())
        .match_query(Matcher::UrlEncoded("local".into(), "true".into()))
        .with_status(200)
        .with_body(format!(r#"{{"cid":{{"/":"{}"}}}}"#, CID))
        .create_async()
        .await;

    let options = StatusOptions {
        local: Some(true),
        ..Default::default()
    };
    let status = client_for(&server).status(CID, &options).await.unwrap();
    assert!(status.peer_map.is_empty());
    assert_eq!(status.name, "");
}

#[tokio::test]
async fn test_status_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/pins/bafymissing")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"code":404,"message":"pin not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .status("bafymissing", &StatusOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        ClusterError::Api {
            status,
            message,
            status_text,
            body,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "pin not found");
            assert_eq!(status_text.as_deref(), Some("Not Found"));
            assert_eq!(body.unwrap()["code"], 404);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_allocation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("/allocations/{}", CID).as_str())
        .with_status(200)
        .with_body(pin_body(CID))
        .create_async()
        .await;

    let pin = client_for(&server)
        .allocation(CID, &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(pin.allocations.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_recover() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("/pins/{}/recover", CID).as_str())
        .match_query(Matcher::Any)
        .with_status(202)
        .with_body(status_body(CID))
        .create_async()
        .await;

    let status = client_for(&server)
        .recover(CID, &StatusOptions::default())
        .await
        .unwrap();
    assert_eq!(status.peer_map.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_metrics() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/monitor/metrics")
        .with_status(200)
        .with_body(r#"["ping","freespace"]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/monitor/metrics/freespace")
        .with_status(200)
        .with_body(
            r#"[{"name":"freespace","peer":"12D3KooWA","value":"1024","expire":1700000000000000000,
                 "valid":true,"weight":1024,"partitionable":false,"received_at":1699999990000000000}]"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let names = client
        .metric_names(&RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(names, ["ping", "freespace"]);

    let metrics = client
        .metrics("freespace", &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].weight, 1024);
    assert_eq!(
        metrics[0].expire,
        Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    );
}

#[tokio::test]
async fn test_basic_auth_header_sent_when_configured() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/version")
        .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
        .with_status(200)
        .with_body(r#"{"version":"1.1.1"}"#)
        .create_async()
        .await;

    let endpoint = ClusterEndpoint::new(&server.url())
        .unwrap()
        .with_basic_auth("admin", "secret")
        .unwrap();
    let client = ClusterClient::new(endpoint).unwrap();
    client.version(&RequestOptions::default()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_auth_header_without_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/version")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"version":"1.1.1"}"#)
        .create_async()
        .await;

    let endpoint = ClusterEndpoint::with_credentials(&server.url(), Some("admin"), None).unwrap();
    let client = ClusterClient::new(endpoint).unwrap();
    client.version(&RequestOptions::default()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_access_denied() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/version")
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = client_for(&server)
        .version(&RequestOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_access_denied());
    assert!(matches!(err, ClusterError::Api { ref message, .. } if message == "Unauthorized"));
}

#[tokio::test]
async fn test_endpoint_with_base_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v0/version")
        .with_status(200)
        .with_body(r#"{"version":"1.1.1"}"#)
        .create_async()
        .await;

    let endpoint = ClusterEndpoint::new(&format!("{}/api/v0", server.url())).unwrap();
    ClusterClient::new(endpoint)
        .unwrap()
        .version(&RequestOptions::default())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_before_send() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let token = CancelToken::new();
    token.cancel();
    let params = AddParams {
        cancel: Some(token),
        ..Default::default()
    };
    let err = client_for(&server)
        .add_file(FileWithName::new("a.txt", "a"), &params)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_validation_rejects_before_sending() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = ClientConfig {
        validate_options: true,
        ..Default::default()
    };
    let endpoint = ClusterEndpoint::new(&server.url()).unwrap();
    let client = ClusterClient::with_config(endpoint, config).unwrap();

    let params = AddParams {
        cid_version: Some(7),
        ..Default::default()
    };
    let err = client
        .add_file(FileWithName::new("a.txt", "a"), &params)
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::InvalidOption(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_validation_is_off_by_default() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/add")
        .match_query(Matcher::UrlEncoded("cid-version".into(), "7".into()))
        .with_status(400)
        .with_body(r#"{"code":400,"message":"unknown CID version"}"#)
        .create_async()
        .await;

    let params = AddParams {
        cid_version: Some(7),
        ..Default::default()
    };
    let err = client_for(&server)
        .add_file(FileWithName::new("a.txt", "a"), &params)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/version")
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .version(&RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let endpoint = ClusterEndpoint::new("http://127.0.0.1:1").unwrap();
    let config = ClientConfig {
        connect_timeout_ms: 2_000,
        ..Default::default()
    };
    let err = ClusterClient::with_config(endpoint, config)
        .unwrap()
        .version(&RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::Transport(_)));
}

#[test]
fn test_client_is_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<ClusterClient>();
}

#[test]
fn test_blocking_call_with_tokio_test() {
    let token = CancelToken::new();
    token.cancel();
    let endpoint = ClusterEndpoint::new("http://127.0.0.1:9094").unwrap();
    let client = ClusterClient::new(endpoint).unwrap();
    let result = tokio_test::block_on(client.version(&RequestOptions::with_cancel(token)));
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_relative_pin_path_never_reaches_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client_for(&server)
        .pin("/ipfs/../x", &PinOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::InvalidOption(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_unpin_never_reaches_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    for cid in ["", "/", ".."] {
        let err = client
            .unpin(cid, &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClusterError::InvalidOption(_)), "{:?}", cid);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_dot_cid_rejected_for_status_and_allocation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .status("..", &StatusOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::InvalidOption(_)));
    let err = client
        .allocation("", &RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClusterError::InvalidOption(_)));
    mock.assert_async().await;
}
