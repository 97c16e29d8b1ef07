//! Typed ID aliases for all tracked entities.
//!
//! Each record type is its own marker, so an id of one entity cannot be
//! passed where another's is expected.
//!
//! ```rust
//! use provenance_core::common::{RepositoryId, SourceId};
//!
//! let source_id = SourceId::new();
//! let repository_id = RepositoryId::new();
//!
//! // This would be a compile error:
//! // let wrong: SourceId = repository_id;
//! # let _ = (source_id, repository_id);
//! ```

pub use super::id::Id;

use crate::domains::configurations::Configuration;
use crate::domains::contribution_types::ContributionType;
use crate::domains::contributions::Contribution;
use crate::domains::contributors::Contributor;
use crate::domains::repositories::Repository;
use crate::domains::sources::Source;

pub type SourceId = Id<Source>;
pub type RepositoryId = Id<Repository>;
pub type ContributorId = Id<Contributor>;
pub type ContributionTypeId = Id<ContributionType>;
pub type ContributionId = Id<Contribution>;
pub type ConfigurationId = Id<Configuration>;
