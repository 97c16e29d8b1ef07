// ServerKernel - one foundation service per entity
//
// The ServerKernel is built from ServerDeps; every service shares the same
// clock and logger and gets its own store.

use crate::domains::configurations::ConfigurationService;
use crate::domains::contribution_types::ContributionTypeService;
use crate::domains::contributions::ContributionService;
use crate::domains::contributors::ContributorService;
use crate::domains::repositories::RepositoryService;
use crate::domains::sources::SourceService;
use crate::foundation::FoundationService;

use super::ServerDeps;

/// ServerKernel holds all entity services
#[derive(Clone)]
pub struct ServerKernel {
    pub sources: SourceService,
    pub repositories: RepositoryService,
    pub contributors: ContributorService,
    pub contribution_types: ContributionTypeService,
    pub contributions: ContributionService,
    pub configurations: ConfigurationService,
}

impl ServerKernel {
    /// Creates a new ServerKernel over the given dependencies
    pub fn new(deps: &ServerDeps) -> Self {
        let clock = &deps.clock;
        let logger = &deps.logger;

        Self {
            sources: FoundationService::new(deps.sources.clone(), clock.clone(), logger.clone()),
            repositories: FoundationService::new(
                deps.repositories.clone(),
                clock.clone(),
                logger.clone(),
            ),
            contributors: FoundationService::new(
                deps.contributors.clone(),
                clock.clone(),
                logger.clone(),
            ),
            contribution_types: FoundationService::new(
                deps.contribution_types.clone(),
                clock.clone(),
                logger.clone(),
            ),
            contributions: FoundationService::new(
                deps.contributions.clone(),
                clock.clone(),
                logger.clone(),
            ),
            configurations: FoundationService::new(
                deps.configurations.clone(),
                clock.clone(),
                logger.clone(),
            ),
        }
    }
}
