//! Server dependencies for foundation services (using traits for testability)
//!
//! This module provides the central dependency container every service is built from.
//! The clock, the logger and each entity's store sit behind trait abstractions.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::configurations::Configuration;
use crate::domains::contribution_types::ContributionType;
use crate::domains::contributions::Contribution;
use crate::domains::contributors::Contributor;
use crate::domains::repositories::Repository;
use crate::domains::sources::Source;
use crate::kernel::{BaseClock, BaseLogger, BaseStore, PgStore, SystemClock, TracingLogger};

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub clock: Arc<dyn BaseClock>,
    pub logger: Arc<dyn BaseLogger>,
    pub sources: Arc<dyn BaseStore<Source>>,
    pub repositories: Arc<dyn BaseStore<Repository>>,
    pub contributors: Arc<dyn BaseStore<Contributor>>,
    pub contribution_types: Arc<dyn BaseStore<ContributionType>>,
    pub contributions: Arc<dyn BaseStore<Contribution>>,
    pub configurations: Arc<dyn BaseStore<Configuration>>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<dyn BaseClock>,
        logger: Arc<dyn BaseLogger>,
        sources: Arc<dyn BaseStore<Source>>,
        repositories: Arc<dyn BaseStore<Repository>>,
        contributors: Arc<dyn BaseStore<Contributor>>,
        contribution_types: Arc<dyn BaseStore<ContributionType>>,
        contributions: Arc<dyn BaseStore<Contribution>>,
        configurations: Arc<dyn BaseStore<Configuration>>,
    ) -> Self {
        Self {
            clock,
            logger,
            sources,
            repositories,
            contributors,
            contribution_types,
            contributions,
            configurations,
        }
    }

    /// Production wiring: system clock, tracing logger, one Postgres store for every entity
    pub fn postgres(db_pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db_pool));

        Self::new(
            Arc::new(SystemClock),
            Arc::new(TracingLogger),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }
}
