//! Database-layer error types.
//!
//! All session-manager operations return [`DbError`] on failure, which can be
//! matched to determine the underlying cause (lifecycle misuse, configuration,
//! engine failure).

use thiserror::Error;

/// Errors that can occur in the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Connection string or engine settings are unusable.
    ///
    /// Raised at `init` time and never retried automatically.
    #[error("invalid database configuration: {0}")]
    InvalidConfiguration(String),

    /// An acquisition or teardown was attempted before a successful `init`
    /// (or after `close`). Always an ordering bug in the caller, not a
    /// transient condition.
    #[error("session manager is not initialized")]
    NotInitialized,

    /// A second `init` was attempted without an intervening `close`.
    #[error("session manager is already initialized")]
    AlreadyInitialized,

    /// Engine or transaction operation failed (sqlx error).
    ///
    /// When raised inside an active scope the transaction has already been
    /// rolled back before this propagates.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid data in the database (e.g., unknown enum value).
    #[error("invalid data: {0}")]
    InvalidData(String),
}
