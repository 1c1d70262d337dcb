//! HTTP-level tests for `LoggingServiceClient` against a scripted service.

use chrono::{DateTime, Utc};
use intlog_core::model::{ExceptionRecord, Meta, TransactionId, TransactionTag};
use intlog_core::{ClientConfig, ClientError, LoggingServiceClient, TransactionApi};
use intlog_stub::StubService;
use serde_json::json;

fn client_for(stub: &StubService) -> LoggingServiceClient {
    LoggingServiceClient::new(ClientConfig::new(stub.url())).unwrap()
}

fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T08:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_create_transaction() {
    let stub = StubService::start([(201, r#"{"integration_transaction_id": 42}"#)]);
    let client = client_for(&stub);

    let mut meta = Meta::new();
    meta.insert("status".into(), json!("running"));
    let tag = TransactionTag::new("daily_sync", "acme", "cred-1");

    let created = client
        .create_transaction(&tag, start_time(), Some(&meta))
        .unwrap();
    assert_eq!(created.integration_transaction_id, TransactionId::from(42));

    let requests = stub.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/transaction");
    assert_eq!(
        requests[0].body,
        json!({
            "tag": "daily_sync-acme-cred-1",
            "start_time": "2026-03-01T08:30:00Z",
            "meta": {"status": "running"}
        })
    );
}

#[test]
fn test_update_sends_only_supplied_fields() {
    let stub = StubService::start([(204, "")]);
    let client = client_for(&stub);

    client
        .update_transaction(&TransactionId::from(42), Some(start_time()), None, None)
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/transaction/42");
    assert_eq!(requests[0].body, json!({"end_time": "2026-03-01T08:30:00Z"}));
}

#[test]
fn test_get_transaction() {
    let stub = StubService::start([(
        200,
        r#"{"integration_transaction_id": "abc", "tag": "daily_sync-acme-cred-1", "meta": {"error_count": 2}}"#,
    )]);
    let client = client_for(&stub);

    let tx = client.get_transaction(&TransactionId::from("abc")).unwrap();
    assert_eq!(tx.tag.as_deref(), Some("daily_sync-acme-cred-1"));
    assert_eq!(tx.meta["error_count"], 2);

    let requests = stub.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/transaction/abc");
}

#[test]
fn test_id_with_slash_stays_one_segment() {
    let stub = StubService::start([(200, r#"{"integration_transaction_id": "a/b"}"#)]);
    let client = client_for(&stub);

    let tx = client.get_transaction(&TransactionId::from("a/b")).unwrap();
    assert_eq!(tx.integration_transaction_id.as_str(), "a/b");

    assert_eq!(stub.requests()[0].path, "/transaction/a%2Fb");
}

#[test]
fn test_search_posts_fixed_query() {
    let stub = StubService::start([(
        200,
        r#"[{"integration_transaction_id": 1, "tag": "a-b-c"}, {"integration_transaction_id": 2, "tag": "d-e-f"}]"#,
    )]);
    let client = client_for(&stub);

    let results = client.search_transactions().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].integration_transaction_id.as_str(), "2");

    let requests = stub.requests();
    assert_eq!(requests[0].path, "/transaction/search");
    assert_eq!(
        requests[0].body,
        json!({"distinct": "tag", "order_by": "tag,start_time"})
    );
}

#[test]
fn test_create_exceptions() {
    let stub = StubService::start([(201, "{}")]);
    let client = client_for(&stub);

    let records = vec![
        ExceptionRecord::new("first", "trace one"),
        ExceptionRecord::new("second", "trace two"),
    ];
    client
        .create_transaction_exceptions(&TransactionId::from(9), &records)
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].path, "/transaction/9/exception");
    let sent = requests[0].body["exceptions"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1]["message"], "second");
    assert_eq!(sent[1]["stack_trace"], "trace two");
}

#[test]
fn test_non_success_status_is_error() {
    let stub = StubService::start([(500, r#"{"error": "db down"}"#)]);
    let client = client_for(&stub);

    let err = client
        .create_transaction(&TransactionTag::new("a", "b", "c"), start_time(), None)
        .unwrap_err();
    match err {
        ClientError::Status { status, url } => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/transaction"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_missing_id_is_decode_error() {
    let stub = StubService::start([(200, r#"{"tag": "a-b-c"}"#)]);
    let client = client_for(&stub);

    let err = client
        .create_transaction(&TransactionTag::new("a", "b", "c"), start_time(), None)
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn test_unreachable_host_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("http://127.0.0.1:{port}");
    let client = LoggingServiceClient::new(ClientConfig::new(url)).unwrap();

    let err = client.search_transactions().unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
