//! Integration tests exercising the client against a stub daemon on loopback.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::time::Duration;

use polo_client::{PoloClient, PoloConfig, PoloError};
use polo_protocol::DatagramTransport;
use serde_json::{json, Value};
use tokio::net::UdpSocket;

/// Spawn a stub daemon that answers `count` requests by calling `reply_for`
/// on each decoded request object.
async fn spawn_stub<F>(count: usize, mut reply_for: F) -> SocketAddr
where
    F: FnMut(&Value) -> String + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        for _ in 0..count {
            let (len, from) = socket.recv_from(&mut buf).await.unwrap();
            let request: Value = serde_json::from_slice(&buf[..len]).unwrap();
            let reply = reply_for(&request);
            socket.send_to(reply.as_bytes(), from).await.unwrap();
        }
    });
    addr
}

/// A client whose datagram transport points at `daemon`.
async fn client_for(daemon: SocketAddr, timeout: Duration) -> PoloClient {
    let mut config = PoloConfig::default();
    config.host = daemon.ip().to_string();
    config.port = daemon.port();
    config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap();
    config.params.clear();

    let transport = DatagramTransport::bind(daemon, timeout).await.unwrap();
    PoloClient::with_transport(Box::new(transport), config)
}

#[tokio::test]
async fn publish_round_trip_echoes_service_name() {
    let daemon = spawn_stub(1, |request| {
        assert_eq!(request["action"], "publish");
        format!(r#"{{"OK": {}}}"#, request["service"])
    })
    .await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let value = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap();
    assert_eq!(value, json!("dummy"));
}

#[tokio::test]
async fn groups_and_flags_arrive_on_the_wire() {
    let daemon = spawn_stub(1, |request| {
        assert_eq!(request["multicast_groups"], json!(["224.2.2.2", "224.2.2.3"]));
        assert_eq!(request["permanent"], json!(true));
        assert_eq!(request["root"], json!(false));
        r#"{"OK": "dummy"}"#.to_string()
    })
    .await;

    let groups: BTreeSet<String> = ["224.2.2.2", "224.2.2.3"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    client
        .publish_service("dummy", &groups, true, false)
        .await
        .unwrap();
}

#[tokio::test]
async fn unpublish_round_trip() {
    let daemon = spawn_stub(1, |request| {
        assert_eq!(request["action"], "unpublish");
        assert_eq!(request["delete_file"], json!(true));
        r#"{"OK": 0}"#.to_string()
    })
    .await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let value = client
        .unpublish_service("dummy", &BTreeSet::new(), true)
        .await
        .unwrap();
    assert_eq!(value, json!(0));
}

#[tokio::test]
async fn info_returns_service_record() {
    let daemon = spawn_stub(1, |request| {
        assert_eq!(request["action"], "info");
        r#"{"OK": {"identifier": "dummy", "multicast_groups": ["224.0.1.1"], "disabled": false}}"#
            .to_string()
    })
    .await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let value = client.service_info("dummy").await.unwrap();
    assert_eq!(value["identifier"], "dummy");
}

#[tokio::test]
async fn daemon_rejection_surfaces_with_context() {
    let daemon = spawn_stub(1, |_| r#"{"Error": "the service already exists"}"#.to_string()).await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let err = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PoloError::Daemon { .. }));
    assert_eq!(
        err.to_string(),
        "Error in publishing of 'dummy': 'the service already exists'"
    );
}

#[tokio::test]
async fn silent_daemon_times_out_as_internal_error() {
    // A bound socket that never answers.
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let daemon = socket.local_addr().unwrap();

    let mut client = client_for(daemon, Duration::from_millis(50)).await;
    let err = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PoloError::Internal(_)));
    assert!(err.to_string().contains("internal communication"));
}

#[tokio::test]
async fn malformed_stub_reply_is_internal_error() {
    let daemon = spawn_stub(1, |_| "{".to_string()).await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let err = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PoloError::Internal(_)));
}

#[tokio::test]
async fn sequential_calls_reuse_one_socket() {
    let daemon = spawn_stub(3, |request| format!(r#"{{"OK": {}}}"#, request["service"])).await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    for _ in 0..2 {
        let value = client
            .publish_service("dummy", &BTreeSet::new(), false, false)
            .await
            .unwrap();
        assert_eq!(value, json!("dummy"));
    }
    let value = client
        .unpublish_service("dummy", &BTreeSet::new(), false)
        .await
        .unwrap();
    assert_eq!(value, json!("dummy"));
}

#[tokio::test]
async fn failed_call_leaves_client_usable() {
    let daemon = spawn_stub(2, {
        let mut first = true;
        move |request| {
            if std::mem::take(&mut first) {
                r#"{"Error": "the service already exists"}"#.to_string()
            } else {
                format!(r#"{{"OK": {}}}"#, request["service"])
            }
        }
    })
    .await;

    let mut client = client_for(daemon, Duration::from_secs(1)).await;
    let err = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PoloError::Daemon { .. }));

    let value = client
        .publish_service("dummy", &BTreeSet::new(), false, false)
        .await
        .unwrap();
    assert_eq!(value, json!("dummy"));
}
