use std::sync::Arc;

use d_cache::CacheClient;
use d_cache::MemoryTransport;
use d_cache::Payload;
use d_cache::SetOptions;
use futures::future::join_all;

use crate::common::memory_client;

#[tokio::test]
async fn test_conflicting_writer_is_detected() {
    let (_transport, client) = memory_client();
    client.set("balance", "100").await.unwrap();

    let alice = client.with_cas();
    let bob = client.with_cas();
    alice.get("balance", false).await.unwrap();
    bob.get("balance", false).await.unwrap();

    alice.set("balance", "80").await.unwrap();
    let err = bob.set("balance", "90").await.unwrap_err();
    assert!(err.is_modified());

    assert_eq!(client.get("balance", false).await.unwrap(), Some(Payload::from("80")));
}

#[tokio::test]
async fn test_reread_refreshes_token() {
    let (_transport, client) = memory_client();
    client.set("k", "v1").await.unwrap();

    let cas = client.with_cas();
    cas.get("k", false).await.unwrap();
    client.set("k", "v2").await.unwrap();
    assert!(cas.set("k", "mine").await.unwrap_err().is_modified());

    // Reading again picks up the current token
    cas.get("k", false).await.unwrap();
    cas.set("k", "mine").await.unwrap();
    assert_eq!(client.get("k", false).await.unwrap(), Some(Payload::from("mine")));
}

#[tokio::test]
async fn test_unconditional_modes_bypass_tokens() {
    let (_transport, client) = memory_client();
    client.set("k", "v1").await.unwrap();

    let cas = client.with_cas();
    cas.get("k", false).await.unwrap();
    client.set("k", "v2").await.unwrap();

    // REPLACE never carries the stale token
    cas.set_with("k", "v3", SetOptions::replace()).await.unwrap();
    assert_eq!(client.get("k", false).await.unwrap(), Some(Payload::from("v3")));
}

#[tokio::test]
async fn test_removed_key_rejects_cas_write() {
    let (_transport, client) = memory_client();
    client.set("k", "v").await.unwrap();

    let cas = client.with_cas();
    cas.get("k", false).await.unwrap();
    cas.remove("k").await.unwrap();

    let err = cas.set("k", "again").await.unwrap_err();
    assert!(matches!(
        err,
        d_cache::Error::Operation(d_cache::OperationError::Service {
            status: d_cache::Status::KeyNotFound
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_read_modify_write_has_single_winner() {
    let transport = Arc::new(MemoryTransport::new());
    let client = CacheClient::new(transport);
    client.set("counter", "0").await.unwrap();

    let writers: Vec<_> = (0..8).map(|_| client.with_cas()).collect();
    for writer in &writers {
        writer.get("counter", false).await.unwrap();
    }

    let outcomes = join_all(
        writers
            .iter()
            .enumerate()
            .map(|(i, writer)| async move { writer.set("counter", i.to_string()).await }),
    )
    .await;

    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| r.as_ref().is_err_and(|e| e.is_modified()))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);
}
