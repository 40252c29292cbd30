//! Crawl record storage.
//!
//! CRUD operations for the crawls table. All operations run against a
//! caller-supplied connection, so they compose with whatever scope the
//! caller acquired from the session manager (one transaction boundary via
//! `connect()`, or an explicit-commit unit of work via `session()`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::AnyConnection;
use sqlx::Row;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::db::DbError;

// =============================================================================
// Types
// =============================================================================

/// Crawl lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CrawlStatus {
    /// Queued, not yet started.
    Pending,
    /// Actively being crawled.
    Running,
    /// Finished successfully.
    Done,
    /// Aborted with an error.
    Failed,
}

/// Crawl record stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// Database ID (None for new records).
    pub id: Option<i64>,
    /// Start URL of the crawl.
    pub url: String,
    /// Current status.
    pub status: CrawlStatus,
    /// Creation timestamp (Unix millis).
    pub created_at: i64,
    /// Last update timestamp (Unix millis).
    pub updated_at: i64,
}

impl CrawlRecord {
    /// Create a new pending record for a start URL.
    pub fn new(url: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: None,
            url: url.into(),
            status: CrawlStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Crawl Store
// =============================================================================

/// Storage operations for crawl records.
///
/// Stateless: every method borrows an active connection, leaving
/// commit/rollback policy to the scope that owns it.
pub struct CrawlStore;

impl CrawlStore {
    /// Insert a record and return its ID.
    pub async fn insert(conn: &mut AnyConnection, record: &CrawlRecord) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO crawls (url, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&record.url)
        .bind(record.status.as_ref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Fetch a record by ID.
    pub async fn get(conn: &mut AnyConnection, id: i64) -> Result<Option<CrawlRecord>, DbError> {
        let row = sqlx::query(
            "SELECT id, url, status, created_at, updated_at FROM crawls WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(row_to_record).transpose()
    }

    /// List all records, newest first.
    pub async fn list(conn: &mut AnyConnection) -> Result<Vec<CrawlRecord>, DbError> {
        let rows = sqlx::query(
            "SELECT id, url, status, created_at, updated_at FROM crawls ORDER BY created_at DESC",
        )
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// Update a record's status, touching its updated_at stamp.
    ///
    /// Returns whether a record with that ID existed.
    pub async fn update_status(
        conn: &mut AnyConnection,
        id: i64,
        status: CrawlStatus,
    ) -> Result<bool, DbError> {
        let now = chrono::Utc::now().timestamp_millis();
        let result = sqlx::query("UPDATE crawls SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status.as_ref())
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_record(row: sqlx::any::AnyRow) -> Result<CrawlRecord, DbError> {
    let status_raw: String = row.try_get("status")?;
    let status = CrawlStatus::from_str(&status_raw)
        .map_err(|_| DbError::InvalidData(format!("unknown crawl status '{status_raw}'")))?;

    Ok(CrawlRecord {
        id: Some(row.try_get("id")?),
        url: row.try_get("url")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
