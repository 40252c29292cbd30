//! Database Layer
//!
//! Lifecycle-managed access to the relational store:
//! - **[`SessionManager`]**: owns the engine and session factory, enforces
//!   the initialized/uninitialized state machine
//! - **[`TransactionScope`] / [`Session`]**: scoped acquisition with
//!   release-on-every-exit-path guarantees
//! - **[`SchemaDescriptor`]**: declarative create/drop DDL for bootstrap and
//!   test use
//! - **[`CrawlStore`]**: CRUD for crawl records
//!
//! The manager is constructed once at startup, passed by `Arc` into request
//! handlers, and closed after the last request completes.

mod crawl_store;
mod error;
mod manager;
mod schema;
mod session;

pub use crawl_store::{CrawlRecord, CrawlStatus, CrawlStore};
pub use error::DbError;
pub use manager::{redact_url, EngineOptions, SessionManager};
pub use schema::{crawler_schema, Entity, SchemaDescriptor, SqlDialect};
pub use session::{Session, TransactionScope};
