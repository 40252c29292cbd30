//! Declarative schema descriptors.
//!
//! A [`SchemaDescriptor`] is an ordered list of entities with paired
//! create/drop DDL. [`crate::db::SessionManager::create_all`] and
//! [`crate::db::SessionManager::drop_all`] walk a descriptor to bootstrap or
//! tear down a database. This is intended for tests and first-boot
//! provisioning only — production schema changes belong to an external
//! migration tool.

use crate::db::DbError;

/// SQL dialect of a backend, for DDL that cannot be written portably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    /// SQLite (test and local databases).
    Sqlite,
    /// PostgreSQL (production).
    Postgres,
}

impl SqlDialect {
    /// Detect the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        let url = url.trim();
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if url.starts_with("postgres:") || url.starts_with("postgresql:") {
            Ok(Self::Postgres)
        } else {
            Err(DbError::InvalidConfiguration(format!(
                "unsupported database URL scheme in '{url}'"
            )))
        }
    }
}

/// A single entity (table, index) with its create/drop statements.
///
/// `create_sql` must be idempotent (IF NOT EXISTS) and `drop_sql` must be
/// safe against a missing entity (IF EXISTS), so create/drop round-trips can
/// run in any state.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Entity name, used for logging only.
    pub name: &'static str,
    /// Idempotent creation DDL.
    pub create_sql: &'static str,
    /// Idempotent drop DDL.
    pub drop_sql: &'static str,
}

/// Ordered set of entities making up a schema.
///
/// Creation runs in declaration order; drops run in reverse so dependent
/// entities (indexes) go before their tables.
#[derive(Debug, Clone, Default)]
pub struct SchemaDescriptor {
    entities: Vec<Entity>,
}

impl SchemaDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to the descriptor.
    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Entities in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of declared entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the descriptor declares no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// SQL statement for creating the crawls table on SQLite.
///
/// Timestamps are Unix millis; status is a lowercase enum string matching
/// [`crate::db::CrawlStatus`]. `INTEGER PRIMARY KEY` aliases the rowid, so
/// inserts that omit `id` get one assigned.
pub const CRAWLS_TABLE_SQLITE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS crawls (
    id         INTEGER PRIMARY KEY,
    url        TEXT NOT NULL,
    status     TEXT NOT NULL DEFAULT 'pending',
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
)
"#;

/// SQL statement for creating the crawls table on PostgreSQL.
///
/// Same shape as the SQLite variant; the identity clause is what gives
/// id-omitting inserts an auto-assigned key here.
pub const CRAWLS_TABLE_POSTGRES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS crawls (
    id         BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
    url        TEXT NOT NULL,
    status     TEXT NOT NULL DEFAULT 'pending',
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
)
"#;

/// SQL statement for dropping the crawls table.
pub const CRAWLS_TABLE_DROP_DDL: &str = "DROP TABLE IF EXISTS crawls";

/// SQL statement for the status lookup index.
pub const CRAWLS_STATUS_INDEX_DDL: &str =
    "CREATE INDEX IF NOT EXISTS idx_crawls_status ON crawls (status)";

/// SQL statement for dropping the status lookup index.
pub const CRAWLS_STATUS_INDEX_DROP_DDL: &str = "DROP INDEX IF EXISTS idx_crawls_status";

/// The canonical crawler schema for a backend: the crawls table and its
/// status index.
pub fn crawler_schema(dialect: SqlDialect) -> SchemaDescriptor {
    let crawls_create = match dialect {
        SqlDialect::Sqlite => CRAWLS_TABLE_SQLITE_DDL,
        SqlDialect::Postgres => CRAWLS_TABLE_POSTGRES_DDL,
    };

    SchemaDescriptor::new()
        .entity(Entity {
            name: "crawls",
            create_sql: crawls_create,
            drop_sql: CRAWLS_TABLE_DROP_DDL,
        })
        .entity(Entity {
            name: "idx_crawls_status",
            create_sql: CRAWLS_STATUS_INDEX_DDL,
            drop_sql: CRAWLS_STATUS_INDEX_DROP_DDL,
        })
}
