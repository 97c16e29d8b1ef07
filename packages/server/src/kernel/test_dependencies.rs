// TestDependencies - mock implementations for testing
//
// Provides a scripted clock, a spy logger and in-memory stores that can be
// injected into ServerKernel for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{BaseClock, BaseLogger, BaseStore, ServerDeps, ServerKernel, StoreFault};
use crate::common::Id;
use crate::domains::configurations::Configuration;
use crate::domains::contribution_types::ContributionType;
use crate::domains::contributions::Contribution;
use crate::domains::contributors::Contributor;
use crate::domains::repositories::Repository;
use crate::domains::sources::Source;
use crate::foundation::{FaultTier, Record, ServiceError, Severity};

// =============================================================================
// Mock Clock
// =============================================================================

pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
    failure: Mutex<Option<String>>,
    calls: Mutex<usize>,
}

impl MockClock {
    /// Clock frozen at the moment of construction
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Clock frozen at `now`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            failure: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    /// Every read fails with `message`
    pub fn failing(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Number of times the clock was read
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseClock for MockClock {
    async fn now(&self) -> Result<DateTime<Utc>> {
        *self.calls.lock().unwrap() += 1;

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(*self.now.lock().unwrap())
    }
}

// =============================================================================
// Spy Logger
// =============================================================================

/// One failure as it reached the logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedFault {
    pub severity: Severity,
    pub tier: FaultTier,
    pub entity: &'static str,
    pub kind: &'static str,
    /// Outer message
    pub message: String,
    /// Inner (fault) message
    pub detail: String,
}

pub struct SpyLogger {
    entries: Arc<Mutex<Vec<LoggedFault>>>,
}

impl SpyLogger {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Everything logged, in order
    pub fn entries(&self) -> Vec<LoggedFault> {
        self.entries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LoggedFault> {
        self.with_severity(Severity::Error)
    }

    pub fn criticals(&self) -> Vec<LoggedFault> {
        self.with_severity(Severity::Critical)
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn with_severity(&self, severity: Severity) -> Vec<LoggedFault> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.severity == severity)
            .cloned()
            .collect()
    }

    fn record(&self, severity: Severity, error: &ServiceError) {
        self.entries.lock().unwrap().push(LoggedFault {
            severity,
            tier: error.tier(),
            entity: error.entity(),
            kind: error.fault().kind(),
            message: error.to_string(),
            detail: error.fault().to_string(),
        });
    }
}

impl Default for SpyLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseLogger for SpyLogger {
    fn log_error(&self, error: &ServiceError) {
        self.record(Severity::Error, error);
    }

    fn log_critical(&self, error: &ServiceError) {
        self.record(Severity::Critical, error);
    }
}

// =============================================================================
// Mock Store
// =============================================================================

/// Store operation, used to script faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    SelectAll,
    SelectById,
    Update,
    Delete,
}

/// A call captured by MockStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Insert(Uuid),
    SelectAll,
    SelectById(Uuid),
    Update(Uuid),
    Delete(Uuid),
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::Insert(_) => StoreOp::Insert,
            StoreCall::SelectAll => StoreOp::SelectAll,
            StoreCall::SelectById(_) => StoreOp::SelectById,
            StoreCall::Update(_) => StoreOp::Update,
            StoreCall::Delete(_) => StoreOp::Delete,
        }
    }
}

/// In-memory store keyed by id.
///
/// Inserting a taken id fails with `DuplicateKey`; updating or deleting a
/// missing id fails with `Concurrency`, like a row that vanished between the
/// select and the write.
pub struct MockStore<R: Record> {
    rows: Arc<Mutex<Vec<R>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    faults: Arc<Mutex<Vec<(StoreOp, StoreFault)>>>,
}

impl<R: Record> MockStore<R> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed a stored record
    pub fn with_record(self, record: R) -> Self {
        self.rows.lock().unwrap().push(record);
        self
    }

    /// The next `op` fails with `fault` (one-shot, queued per op)
    pub fn with_fault(self, op: StoreOp, fault: StoreFault) -> Self {
        self.faults.lock().unwrap().push((op, fault));
        self
    }

    /// Get all calls made to the store
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to `op`
    pub fn call_count(&self, op: StoreOp) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Current contents, in insertion order
    pub fn rows(&self) -> Vec<R> {
        self.rows.lock().unwrap().clone()
    }

    fn enter(&self, call: StoreCall) -> Result<(), StoreFault> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);

        let mut faults = self.faults.lock().unwrap();
        let scripted = faults.iter().position(|(scripted, _)| *scripted == op);
        match scripted {
            Some(index) => Err(faults.remove(index).1),
            None => Ok(()),
        }
    }

    fn position(rows: &[R], id: Id<R>) -> Option<usize> {
        rows.iter().position(|row| row.id() == id)
    }
}

impl<R: Record> Default for MockStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> BaseStore<R> for MockStore<R> {
    async fn insert(&self, record: R) -> Result<R, StoreFault> {
        self.enter(StoreCall::Insert(record.id().into_uuid()))?;

        let mut rows = self.rows.lock().unwrap();
        if Self::position(&rows, record.id()).is_some() {
            return Err(StoreFault::DuplicateKey(anyhow!(
                "{} {} already stored",
                R::NAME,
                record.id()
            )));
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn select_all(&self) -> Result<Vec<R>, StoreFault> {
        self.enter(StoreCall::SelectAll)?;
        Ok(self.rows())
    }

    async fn select_by_id(&self, id: Id<R>) -> Result<Option<R>, StoreFault> {
        self.enter(StoreCall::SelectById(id.into_uuid()))?;

        let rows = self.rows.lock().unwrap();
        Ok(Self::position(&rows, id).map(|index| rows[index].clone()))
    }

    async fn update(&self, record: R) -> Result<R, StoreFault> {
        self.enter(StoreCall::Update(record.id().into_uuid()))?;

        let mut rows = self.rows.lock().unwrap();
        match Self::position(&rows, record.id()) {
            Some(index) => {
                rows[index] = record.clone();
                Ok(record)
            }
            None => Err(StoreFault::Concurrency(anyhow!(
                "{} {} vanished before update",
                R::NAME,
                record.id()
            ))),
        }
    }

    async fn delete(&self, record: R) -> Result<R, StoreFault> {
        self.enter(StoreCall::Delete(record.id().into_uuid()))?;

        let mut rows = self.rows.lock().unwrap();
        match Self::position(&rows, record.id()) {
            Some(index) => Ok(rows.remove(index)),
            None => Err(StoreFault::Concurrency(anyhow!(
                "{} {} vanished before delete",
                R::NAME,
                record.id()
            ))),
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub clock: Arc<MockClock>,
    pub logger: Arc<SpyLogger>,
    pub sources: Arc<MockStore<Source>>,
    pub repositories: Arc<MockStore<Repository>>,
    pub contributors: Arc<MockStore<Contributor>>,
    pub contribution_types: Arc<MockStore<ContributionType>>,
    pub contributions: Arc<MockStore<Contribution>>,
    pub configurations: Arc<MockStore<Configuration>>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(MockClock::new()),
            logger: Arc::new(SpyLogger::new()),
            sources: Arc::new(MockStore::new()),
            repositories: Arc::new(MockStore::new()),
            contributors: Arc::new(MockStore::new()),
            contribution_types: Arc::new(MockStore::new()),
            contributions: Arc::new(MockStore::new()),
            configurations: Arc::new(MockStore::new()),
        }
    }

    /// Set a mock clock
    pub fn mock_clock(mut self, clock: MockClock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Set a mock source store
    pub fn mock_sources(mut self, store: MockStore<Source>) -> Self {
        self.sources = Arc::new(store);
        self
    }

    /// Set a mock repository store
    pub fn mock_repositories(mut self, store: MockStore<Repository>) -> Self {
        self.repositories = Arc::new(store);
        self
    }

    /// Set a mock contributor store
    pub fn mock_contributors(mut self, store: MockStore<Contributor>) -> Self {
        self.contributors = Arc::new(store);
        self
    }

    /// Set a mock contribution type store
    pub fn mock_contribution_types(mut self, store: MockStore<ContributionType>) -> Self {
        self.contribution_types = Arc::new(store);
        self
    }

    /// Set a mock contribution store
    pub fn mock_contributions(mut self, store: MockStore<Contribution>) -> Self {
        self.contributions = Arc::new(store);
        self
    }

    /// Set a mock configuration store
    pub fn mock_configurations(mut self, store: MockStore<Configuration>) -> Self {
        self.configurations = Arc::new(store);
        self
    }

    pub fn deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.clock.clone(),
            self.logger.clone(),
            self.sources.clone(),
            self.repositories.clone(),
            self.contributors.clone(),
            self.contribution_types.clone(),
            self.contributions.clone(),
            self.configurations.clone(),
        )
    }

    /// Convert into a ServerKernel for testing
    pub fn into_kernel(self) -> Arc<ServerKernel> {
        Arc::new(ServerKernel::new(&self.deps()))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
