//! Scoped transaction and session guards.
//!
//! Both guards wrap an open [`sqlx::Transaction`] on a pooled connection and
//! rely on its rollback-on-drop behavior: whatever way a scope is exited
//! (explicit finish, error path, early return, task cancellation), pending
//! changes are discarded and the connection goes back to the pool.
//!
//! The two types differ only in commit policy:
//! - [`TransactionScope`] (from `connect()`) represents one transaction
//!   boundary; the closure form `SessionManager::with_transaction` commits on
//!   success automatically.
//! - [`Session`] (from `session()`) is a unit of work that never
//!   auto-commits; the caller must call [`Session::commit`] to persist.

use std::ops::{Deref, DerefMut};

use sqlx::AnyConnection;
use sqlx::{Any, Transaction};

use crate::db::DbError;

/// A transaction scope acquired via `SessionManager::connect`.
///
/// Derefs to [`AnyConnection`], so queries run directly against the scope:
///
/// ```ignore
/// let mut scope = manager.connect().await?;
/// sqlx::query("DELETE FROM crawls").execute(&mut *scope).await?;
/// scope.commit().await?;
/// ```
pub struct TransactionScope {
    tx: Transaction<'static, Any>,
}

impl TransactionScope {
    pub(crate) fn new(tx: Transaction<'static, Any>) -> Self {
        Self { tx }
    }

    /// Commit the transaction and return the connection to the pool.
    pub async fn commit(self) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll the transaction back and return the connection to the pool.
    ///
    /// Dropping the scope has the same effect; this form surfaces rollback
    /// failures instead of discarding them.
    pub async fn rollback(self) -> Result<(), DbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl Deref for TransactionScope {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for TransactionScope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl std::fmt::Debug for TransactionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionScope").finish_non_exhaustive()
    }
}

/// A unit-of-work session acquired via `SessionManager::session`.
///
/// Pending changes are discarded unless [`Session::commit`] is called before
/// the session leaves scope.
pub struct Session {
    tx: Transaction<'static, Any>,
}

impl Session {
    pub(crate) fn new(tx: Transaction<'static, Any>) -> Self {
        Self { tx }
    }

    /// Persist all pending changes and close the session.
    pub async fn commit(self) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Discard all pending changes and close the session.
    pub async fn rollback(self) -> Result<(), DbError> {
        tracing::debug!("session rolled back explicitly");
        self.tx.rollback().await?;
        Ok(())
    }
}

impl Deref for Session {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
