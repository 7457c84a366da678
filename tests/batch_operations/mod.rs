use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use d_cache::ByteKey;
use d_cache::CacheClient;
use d_cache::Error;
use d_cache::OperationError;
use d_cache::Payload;
use d_cache::SetOptions;

use crate::common::memory_client;
use crate::common::RecordingTransport;

#[tokio::test]
async fn test_set_get_remove_roundtrip() {
    let (_transport, client) = memory_client();

    assert_eq!(client.get("user:1001", false).await.unwrap(), None);
    client.set("user:1001", "Alice").await.unwrap();
    assert_eq!(
        client.get("user:1001", false).await.unwrap(),
        Some(Payload::Text("Alice".to_string()))
    );
    assert_eq!(
        client.get(b"user:1001".to_vec(), true).await.unwrap(),
        Some(Payload::Bytes(Bytes::from_static(b"Alice")))
    );

    client.remove("user:1001").await.unwrap();
    client.remove("user:1001").await.unwrap();
    assert_eq!(client.get("user:1001", false).await.unwrap(), None);
}

#[tokio::test]
async fn test_set_all_then_get_all() {
    let (_transport, client) = memory_client();
    client
        .set_all(vec![("a", "1"), ("b", "2"), ("c", "3")])
        .await
        .unwrap();

    let values = client.get_all(["a", "missing", "c"], false).await.unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[&ByteKey::from("a")], Some(Payload::from("1")));
    assert_eq!(values[&ByteKey::from("missing")], None);
    assert_eq!(values[&ByteKey::from("c")], Some(Payload::from("3")));

    client.remove_all(["a", "b", "c", "never-there"]).await.unwrap();
    let values = client.get_all(["a", "b", "c"], false).await.unwrap();
    assert!(values.values().all(Option::is_none));
}

#[tokio::test]
async fn test_add_and_replace_semantics() {
    let (_transport, client) = memory_client();

    let err = client.set_with("k", "v", SetOptions::replace()).await.unwrap_err();
    assert!(err.is_not_stored());

    client.set_with("k", "v1", SetOptions::add()).await.unwrap();
    let err = client.set_with("k", "v2", SetOptions::add()).await.unwrap_err();
    assert!(err.is_not_stored());

    client.set_with("k", "v3", SetOptions::replace()).await.unwrap();
    assert_eq!(client.get("k", false).await.unwrap(), Some(Payload::from("v3")));
}

#[tokio::test]
async fn test_set_all_stops_reporting_at_first_failure() {
    let (_transport, client) = memory_client();
    client.set("b", "taken").await.unwrap();

    let err = client
        .set_all_with([("a", "1"), ("b", "2")], SetOptions::add())
        .await
        .unwrap_err();
    assert!(err.is_not_stored());
}

#[tokio::test]
async fn test_counters() {
    let (_transport, client) = memory_client();

    assert_eq!(client.increment("hits", 1, 10).await.unwrap(), 10);
    assert_eq!(client.increment("hits", 5, 0).await.unwrap(), 15);
    assert_eq!(client.decrement("hits", 3, 0).await.unwrap(), 12);
    assert_eq!(client.increment("hits", -2, 0).await.unwrap(), 10);
    assert_eq!(client.decrement("hits", 100, 0).await.unwrap(), 0);

    client.set("text", "abc").await.unwrap();
    let err = client.increment("text", 1, 0).await.unwrap_err();
    assert!(matches!(err, Error::Operation(OperationError::Service { .. })));
}

#[tokio::test]
async fn test_decrement_equals_negated_increment() {
    let (_transport, first) = memory_client();
    let (_transport, second) = memory_client();

    for (delta, initial) in [(1, 0), (4, 9), (-3, 2), (0, 5)] {
        first.set("c", "20").await.unwrap();
        second.set("c", "20").await.unwrap();
        assert_eq!(
            first.decrement("c", delta, initial).await.unwrap(),
            second.increment("c", -delta, initial).await.unwrap()
        );
    }
}

#[tokio::test]
async fn test_clear_empties_the_service() {
    let (transport, client) = memory_client();
    client.set_all([("a", "1"), ("b", "2")]).await.unwrap();
    assert_eq!(transport.len(), 2);

    client.clear().await.unwrap();
    assert!(transport.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expiration_is_honored() {
    let (_transport, client) = memory_client();
    client
        .set_with("session", "data", SetOptions::default().expiration(Duration::from_secs(10)))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(9)).await;
    assert!(client.get("session", false).await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(client.get("session", false).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_expiration_is_rejected_before_dispatch() {
    let transport = Arc::new(RecordingTransport::default());
    let client = CacheClient::new(transport.clone());

    let err = client
        .set_with("k", "v", SetOptions::default().expiration(Duration::from_secs(31 * 24 * 3600)))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_truncated_responses_are_internal_errors() {
    let transport = Arc::new(RecordingTransport::truncating());
    let client = CacheClient::new(transport.clone());

    let internal = |err: Error| matches!(err, Error::Operation(OperationError::Internal(_)));
    assert!(internal(client.set("k", "v").await.unwrap_err()));
    assert!(internal(client.get_all(["k", "j"], false).await.unwrap_err()));
    assert!(internal(client.remove("k").await.unwrap_err()));
    assert!(internal(client.increment("n", 1, 0).await.unwrap_err()));
    assert_eq!(transport.calls(), 4);
}

#[tokio::test]
async fn test_metrics_exposition() {
    let (_transport, client) = memory_client();
    client.set("k", "v").await.unwrap();
    client.get("k", false).await.unwrap();

    let text = client.metrics().encode_text();
    assert!(text.contains("dcache_operations_total{op=\"set\",outcome=\"ok\"} 1"));
    assert!(text.contains("dcache_operations_total{op=\"get\",outcome=\"ok\"} 1"));
}
