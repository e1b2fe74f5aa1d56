//! End-to-end fetch scenarios against a mock vault API
//!
//! Exercises the full request/retry/pagination stack: clean pagination,
//! transient-failure recovery, token refresh, duplicate-cursor abort,
//! and non-retryable failures.

use coffer::adapters::vault::{PaginatedFetcher, VaultClient};
use coffer::config::{secret_string, QueryConfig, RetryConfig, VaultConfig};
use coffer::domain::records::{Account, Safe};
use coffer::domain::{CofferError, VaultError};
use mockito::Matcher;
use serde_json::json;

fn test_config(base_url: &str) -> VaultConfig {
    VaultConfig {
        base_url: base_url.to_string(),
        auth_provider: "ldap".to_string(),
        username: Some("auditor".to_string()),
        password: Some(secret_string("pw".to_string())),
        tls_verify: true,
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries: 3,
            // Keep the backoff instant; the delay curve itself is
            // covered by unit tests.
            base_delay_seconds: 0,
        },
        query: QueryConfig::default(),
    }
}

fn safes_page(offset: u64, count: u64) -> serde_json::Value {
    let value: Vec<_> = (0..count)
        .map(|i| json!({ "safeName": format!("Safe-{}", offset + i) }))
        .collect();
    json!({ "value": value })
}

fn page_query(offset: u64, limit: u64) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("offset".into(), offset.to_string()),
        Matcher::UrlEncoded("limit".into(), limit.to_string()),
    ])
}

/// Scenario A: three pages of 100, 100, and 40 safes terminate cleanly
/// on the short page with exactly three requests.
#[tokio::test]
async fn fetch_yields_all_pages_in_offset_order() {
    let mut server = mockito::Server::new_async().await;

    let page1 = server
        .mock("GET", "/api/safes")
        .match_query(page_query(0, 100))
        .with_status(200)
        .with_body(safes_page(0, 100).to_string())
        .expect(1)
        .create_async()
        .await;
    let page2 = server
        .mock("GET", "/api/safes")
        .match_query(page_query(100, 100))
        .with_status(200)
        .with_body(safes_page(100, 100).to_string())
        .expect(1)
        .create_async()
        .await;
    let page3 = server
        .mock("GET", "/api/safes")
        .match_query(page_query(200, 100))
        .with_status(200)
        .with_body(safes_page(200, 40).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let mut collected: Vec<String> = Vec::new();

    let mut fetcher = PaginatedFetcher::new(&mut client, 100);
    let total = fetcher
        .fetch_all::<Safe, _>("api/safes", &[], |batch| {
            collected.extend(batch.iter().map(|s| s.safe_name.clone()));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(total, 240);
    assert_eq!(collected.len(), 240);
    // Offset order: page contents arrive in sequence
    assert_eq!(collected[0], "Safe-0");
    assert_eq!(collected[100], "Safe-100");
    assert_eq!(collected[239], "Safe-239");

    page1.assert_async().await;
    page2.assert_async().await;
    page3.assert_async().await;
}

/// A page equal to the page size followed by an empty page also ends
/// the fetch without error.
#[tokio::test]
async fn fetch_terminates_on_empty_page() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/safes")
        .match_query(page_query(0, 10))
        .with_status(200)
        .with_body(safes_page(0, 10).to_string())
        .expect(1)
        .create_async()
        .await;
    let empty = server
        .mock("GET", "/api/safes")
        .match_query(page_query(10, 10))
        .with_status(200)
        .with_body(json!({ "value": [] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let mut fetcher = PaginatedFetcher::new(&mut client, 10);
    let total = fetcher
        .fetch_all::<Safe, _>("api/safes", &[], |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(total, 10);
    empty.assert_async().await;
}

/// A record identifier repeated across pages aborts the fetch with a
/// pagination-integrity failure instead of looping or deduplicating.
#[tokio::test]
async fn fetch_aborts_on_duplicate_identifier() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/safes")
        .match_query(page_query(0, 2))
        .with_status(200)
        .with_body(json!({ "value": [{"safeName": "A"}, {"safeName": "B"}] }).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/api/safes")
        .match_query(page_query(2, 2))
        .with_status(200)
        .with_body(json!({ "value": [{"safeName": "B"}, {"safeName": "C"}] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let mut yielded = 0usize;

    let mut fetcher = PaginatedFetcher::new(&mut client, 2);
    let err = fetcher
        .fetch_all::<Safe, _>("api/safes", &[], |batch| {
            yielded += batch.len();
            Ok(())
        })
        .await
        .unwrap_err();

    match err {
        CofferError::Vault(VaultError::PaginationIntegrity {
            record_id, offset, ..
        }) => {
            assert_eq!(record_id, "B");
            assert_eq!(offset, 2);
        }
        other => panic!("expected PaginationIntegrity, got {other}"),
    }
    // The duplicate page is rejected before reaching the sink
    assert_eq!(yielded, 2);
}

/// Scenario C: a 401 triggers exactly one re-authentication, and the
/// retried request carries the refreshed token.
#[tokio::test]
async fn expired_token_refreshed_once_inline() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let mut server = mockito::Server::new_async().await;

    let logon_calls = Arc::new(AtomicUsize::new(0));
    let logon_counter = logon_calls.clone();
    let logon = server
        .mock("POST", "/api/auth/ldap/logon")
        .with_status(200)
        .with_body_from_request(move |_| {
            let n = logon_counter.fetch_add(1, Ordering::SeqCst);
            format!("\"token-{}\"", n + 1).into_bytes()
        })
        .expect(2)
        .create_async()
        .await;

    // The stale token is rejected; the refreshed one succeeds.
    let rejected = server
        .mock("GET", "/api/accounts")
        .match_query(page_query(0, 100))
        .match_header("authorization", "token-1")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/api/accounts")
        .match_query(page_query(0, 100))
        .match_header("authorization", "token-2")
        .with_status(200)
        .with_body(json!({ "value": [{"id": "1_1"}] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    client.logon().await.unwrap();

    let mut fetcher = PaginatedFetcher::new(&mut client, 100);
    let total = fetcher
        .fetch_all::<Account, _>("api/accounts", &[], |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(client.token_refresh_count(), 1);
    assert_eq!(logon_calls.load(Ordering::SeqCst), 2);

    logon.assert_async().await;
    rejected.assert_async().await;
    accepted.assert_async().await;
}

/// A non-retryable 4xx aborts after a single request.
#[tokio::test]
async fn forbidden_status_aborts_without_retry() {
    let mut server = mockito::Server::new_async().await;

    let forbidden = server
        .mock("GET", "/api/accounts")
        .with_status(403)
        .with_body("no access")
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_json("api/accounts", &[]).await.unwrap_err();

    match err {
        CofferError::Vault(VaultError::ClientError { status, .. }) => assert_eq!(status, 403),
        other => panic!("expected ClientError, got {other}"),
    }
    forbidden.assert_async().await;
}

/// A 2xx with an empty body is a response-shape failure, never an
/// empty result, and is not retried.
#[tokio::test]
async fn empty_body_is_fatal_not_empty_result() {
    let mut server = mockito::Server::new_async().await;

    let empty = server
        .mock("GET", "/api/safes")
        .with_status(200)
        .with_body("")
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_json("api/safes", &[]).await.unwrap_err();

    assert!(matches!(
        err,
        CofferError::Vault(VaultError::EmptyResponse { .. })
    ));
    empty.assert_async().await;
}

/// Malformed JSON in a 2xx body is equally fatal.
#[tokio::test]
async fn malformed_body_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/safes")
        .with_status(200)
        .with_body("{not json")
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_json("api/safes", &[]).await.unwrap_err();

    assert!(matches!(
        err,
        CofferError::Vault(VaultError::InvalidResponse(_))
    ));
}

/// Persistent server failure consumes every attempt, then surfaces as
/// retries-exhausted.
#[tokio::test]
async fn persistent_failure_exhausts_retries() {
    let mut server = mockito::Server::new_async().await;

    let failing = server
        .mock("GET", "/api/accounts")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_json("api/accounts", &[]).await.unwrap_err();

    match err {
        CofferError::Vault(VaultError::RetriesExhausted { attempts, .. }) => {
            assert_eq!(attempts, 3);
        }
        other => panic!("expected RetriesExhausted, got {other}"),
    }
    failing.assert_async().await;
}

/// A rejected logon is an authentication failure; nothing is retried.
#[tokio::test]
async fn failed_logon_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    let logon = server
        .mock("POST", "/api/auth/ldap/logon")
        .with_status(403)
        .with_body("bad credentials")
        .expect(1)
        .create_async()
        .await;

    let mut client = VaultClient::new(&test_config(&server.url())).unwrap();
    let err = client.logon().await.unwrap_err();

    assert!(matches!(
        err,
        CofferError::Vault(VaultError::AuthenticationFailed(_))
    ));
    logon.assert_async().await;
}
