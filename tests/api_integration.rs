//! API Integration Tests for crawlerd
//!
//! Covers the HTTP surface and the startup/shutdown lifecycle contract.

use std::sync::Arc;

use crawlerd::db::{crawler_schema, EngineOptions, SessionManager, SqlDialect};
use crawlerd::server::{create_router, AppState};
use serde_json::Value;
use tokio::net::TcpListener;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create an initialized session manager backed by a disposable sqlite file.
async fn create_test_db(dir: &tempfile::TempDir) -> Arc<SessionManager> {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());
    let db = Arc::new(SessionManager::new());
    db.init(&url, EngineOptions::default())
        .await
        .expect("Failed to initialize session manager");

    let mut scope = db.connect().await.expect("Failed to open scope");
    db.create_all(&mut scope, &crawler_schema(SqlDialect::Sqlite))
        .await
        .expect("Failed to create schema");
    scope.commit().await.expect("Failed to commit schema");

    db
}

/// Start test server and return base URL plus the shared manager.
async fn start_test_server(db: Arc<SessionManager>) -> String {
    let router = create_router(AppState { db });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    format!("http://{}", addr)
}

// =============================================================================
// Health Tests
// =============================================================================

#[tokio::test]
async fn test_health_ready() {
    let dir = tempfile::tempdir().unwrap();
    let db = create_test_db(&dir).await;
    let base_url = start_test_server(Arc::clone(&db)).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to send health request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("Failed to parse health response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ready");

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_health_degraded_when_uninitialized() {
    // Deployment/ordering bug: the server is up but init was never called.
    // Must surface as a server-side fault, not a client error.
    let db = Arc::new(SessionManager::new());
    let base_url = start_test_server(db).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to send health request");
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.expect("Failed to parse health response");
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_health_degraded_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let db = create_test_db(&dir).await;
    let base_url = start_test_server(Arc::clone(&db)).await;
    let client = reqwest::Client::new();

    db.close().await.unwrap();

    let resp = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to send health request");
    assert_eq!(resp.status(), 503);
}

// =============================================================================
// Stub Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_crawl_stub() {
    let dir = tempfile::tempdir().unwrap();
    let db = create_test_db(&dir).await;
    let base_url = start_test_server(Arc::clone(&db)).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/crawl/", base_url))
        .send()
        .await
        .expect("Failed to send crawl request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("Failed to parse crawl response");
    assert_eq!(body["start_url"], "url_request.url");
    assert_eq!(body["total"], 100);
    assert_eq!(body["visited_urls"], serde_json::json!(["eisisi"]));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_domains_stub() {
    let dir = tempfile::tempdir().unwrap();
    let db = create_test_db(&dir).await;
    let base_url = start_test_server(Arc::clone(&db)).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/domains", base_url))
        .send()
        .await
        .expect("Failed to send domains request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("Failed to parse domains response");
    assert_eq!(body, serde_json::json!(["domain1", "domain2"]));

    db.close().await.unwrap();
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_rollback_visible_across_sessions() {
    use crawlerd::db::{CrawlRecord, CrawlStore, DbError};

    let dir = tempfile::tempdir().unwrap();
    let db = create_test_db(&dir).await;

    // Insert one record, then fail before commit.
    let err = db
        .with_transaction(|conn: &mut sqlx::AnyConnection| {
            Box::pin(async move {
                CrawlStore::insert(conn, &CrawlRecord::new("https://example.com/start")).await?;
                Err::<(), _>(DbError::InvalidData("boom".to_string()))
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidData(_)));

    // Reopen a session: the record must be absent.
    let mut session = db.session().await.unwrap();
    let records = CrawlStore::list(&mut session).await.unwrap();
    assert!(records.is_empty());

    db.close().await.unwrap();
}
