//! Generic CRUD façade over a store, a clock and a logger.
//!
//! One [`FoundationService`] exists per record type. Each operation validates
//! its input, talks to the store, and turns every failure into a single
//! classified [`ServiceError`] that is logged exactly once before it is
//! returned.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::error::{RecordFault, ServiceError, Severity};
use super::record::Record;
use super::validation::{
    validate_against_storage, validate_id, validate_on_add, validate_on_modify, ValidationReport,
};
use crate::common::Id;
use crate::kernel::{BaseClock, BaseLogger, BaseStore, StoreFault};

/// Raw failure inside an operation, before classification.
#[derive(Debug)]
enum Failure {
    Null,
    Invalid(ValidationReport),
    NotFound(Uuid),
    Store(StoreFault),
    Clock(anyhow::Error),
}

impl From<StoreFault> for Failure {
    fn from(fault: StoreFault) -> Self {
        Failure::Store(fault)
    }
}

impl From<ValidationReport> for Failure {
    fn from(report: ValidationReport) -> Self {
        Failure::Invalid(report)
    }
}

impl Failure {
    fn classify(self, entity: &'static str) -> RecordFault {
        match self {
            Failure::Null => RecordFault::Null { entity },
            Failure::Invalid(report) => RecordFault::Invalid { entity, report },
            Failure::NotFound(id) => RecordFault::NotFound { entity, id },
            Failure::Store(fault) => RecordFault::from_store(entity, fault),
            Failure::Clock(source) => RecordFault::FailedService { entity, source },
        }
    }
}

pub struct FoundationService<R: Record> {
    store: Arc<dyn BaseStore<R>>,
    clock: Arc<dyn BaseClock>,
    logger: Arc<dyn BaseLogger>,
}

impl<R: Record> Clone for FoundationService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            logger: self.logger.clone(),
        }
    }
}

impl<R: Record> FoundationService<R> {
    pub fn new(
        store: Arc<dyn BaseStore<R>>,
        clock: Arc<dyn BaseClock>,
        logger: Arc<dyn BaseLogger>,
    ) -> Self {
        Self {
            store,
            clock,
            logger,
        }
    }

    /// Validates and inserts a new record, returning what the store persisted.
    ///
    /// Passing `None` fails validation without touching the clock or the store.
    pub async fn add(&self, record: impl Into<Option<R>>) -> Result<R, ServiceError> {
        let record = record.into();
        self.try_catch("add", async move {
            let record = record.ok_or(Failure::Null)?;
            let now = self.now().await?;
            validate_on_add(&record, now).into_result()?;

            Ok(self.store.insert(record).await?)
        })
        .await
    }

    /// Replaces a stored record after checking it against its current version.
    ///
    /// Creation provenance must be unchanged and `updated_date` must move.
    pub async fn modify(&self, record: impl Into<Option<R>>) -> Result<R, ServiceError> {
        let record = record.into();
        self.try_catch("modify", async move {
            let record = record.ok_or(Failure::Null)?;
            let now = self.now().await?;
            validate_on_modify(&record, now).into_result()?;

            let id = record.id();
            let stored = self
                .store
                .select_by_id(id)
                .await?
                .ok_or_else(|| Failure::NotFound(id.into_uuid()))?;
            validate_against_storage(&record, &stored).into_result()?;

            Ok(self.store.update(record).await?)
        })
        .await
    }

    /// Deletes the record with `id`, returning what the store removed.
    pub async fn remove_by_id(&self, id: Id<R>) -> Result<R, ServiceError> {
        self.try_catch("remove_by_id", async move {
            let stored = self.find(id).await?;
            Ok(self.store.delete(stored).await?)
        })
        .await
    }

    pub async fn retrieve_by_id(&self, id: Id<R>) -> Result<R, ServiceError> {
        self.try_catch("retrieve_by_id", self.find(id)).await
    }

    /// Every stored record. No validation applies.
    pub async fn retrieve_all(&self) -> Result<Vec<R>, ServiceError> {
        self.try_catch("retrieve_all", async move { Ok(self.store.select_all().await?) })
            .await
    }

    async fn find(&self, id: Id<R>) -> Result<R, Failure> {
        validate_id(&id).into_result()?;
        self.store
            .select_by_id(id)
            .await?
            .ok_or_else(|| Failure::NotFound(id.into_uuid()))
    }

    async fn now(&self) -> Result<DateTime<Utc>, Failure> {
        self.clock.now().await.map_err(Failure::Clock)
    }

    /// Runs one operation, classifying and logging its failure once.
    async fn try_catch<T, F>(&self, operation: &'static str, work: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, Failure>>,
    {
        debug!(entity = R::NAME, operation, "foundation operation started");

        match work.await {
            Ok(value) => Ok(value),
            Err(failure) => {
                let err = ServiceError::new(R::NAME, failure.classify(R::NAME));
                debug!(
                    entity = R::NAME,
                    operation,
                    tier = %err.tier(),
                    kind = err.fault().kind(),
                    "foundation operation failed"
                );
                match err.severity() {
                    Severity::Critical => self.logger.log_critical(&err),
                    Severity::Error => self.logger.log_error(&err),
                }
                Err(err)
            }
        }
    }
}
