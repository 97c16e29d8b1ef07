//! Persistence gateway contract.
//!
//! A store persists one record type and reports failures as a [`StoreFault`]
//! whose variant tells the foundation layer how to classify them. Adapters
//! (Postgres, test doubles) are responsible for mapping their native errors
//! onto these variants.

use async_trait::async_trait;
use thiserror::Error;

use crate::common::Id;
use crate::foundation::Record;

/// Failure reported by a persistence gateway.
#[derive(Debug, Error)]
pub enum StoreFault {
    /// A unique key (usually the primary key) is already taken.
    #[error("duplicate key")]
    DuplicateKey(#[source] anyhow::Error),

    /// A reference column points at a record that does not exist.
    #[error("invalid reference")]
    InvalidReference(#[source] anyhow::Error),

    /// A competing modification landed first (row changed or vanished).
    #[error("concurrency conflict")]
    Concurrency(#[source] anyhow::Error),

    /// The store could not be reached or the connection broke.
    #[error("storage unavailable")]
    Transient(#[source] anyhow::Error),

    /// The store was reachable but rejected or failed the operation.
    #[error("storage operation failed")]
    Operation(#[source] anyhow::Error),

    /// Anything the adapter could not recognize.
    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl From<sqlx::Error> for StoreFault {
    fn from(error: sqlx::Error) -> Self {
        let fault: fn(anyhow::Error) -> StoreFault = match &error {
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    StoreFault::DuplicateKey
                } else if db.is_foreign_key_violation() {
                    StoreFault::InvalidReference
                } else if matches!(db.code().as_deref(), Some("40001") | Some("40P01")) {
                    // serialization_failure, deadlock_detected
                    StoreFault::Concurrency
                } else {
                    StoreFault::Operation
                }
            }
            sqlx::Error::RowNotFound => StoreFault::Concurrency,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreFault::Transient,
            _ => StoreFault::Unexpected,
        };

        fault(error.into())
    }
}

/// Key-addressed persistence for one record type.
#[async_trait]
pub trait BaseStore<R: Record>: Send + Sync {
    async fn insert(&self, record: R) -> Result<R, StoreFault>;

    async fn select_all(&self) -> Result<Vec<R>, StoreFault>;

    /// `Ok(None)` when no record has this id.
    async fn select_by_id(&self, id: Id<R>) -> Result<Option<R>, StoreFault>;

    async fn update(&self, record: R) -> Result<R, StoreFault>;

    async fn delete(&self, record: R) -> Result<R, StoreFault>;
}
