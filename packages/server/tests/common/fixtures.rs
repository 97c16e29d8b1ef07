//! Test fixtures for building valid records.
//!
//! Every fixture produces a record that passes add validation against a clock
//! reading of `at`.

use chrono::{DateTime, Duration, DurationRound, Utc};
use provenance_core::common::{
    ConfigurationId, ContributionId, ContributionTypeId, ContributorId, RepositoryId, SourceId,
};
use provenance_core::domains::configurations::Configuration;
use provenance_core::domains::contribution_types::ContributionType;
use provenance_core::domains::contributions::Contribution;
use provenance_core::domains::contributors::Contributor;
use provenance_core::domains::repositories::Repository;
use provenance_core::domains::sources::Source;
use provenance_core::foundation::Audit;

pub const CREATED_BY: &str = "alice";

/// Fixed instant used as the mock clock reading
pub fn fixed_now() -> DateTime<Utc> {
    "2024-05-01T12:00:00Z".parse().unwrap()
}

/// Current time at the precision Postgres stores (microseconds)
pub fn db_now() -> DateTime<Utc> {
    Utc::now()
        .duration_trunc(Duration::microseconds(1))
        .unwrap()
}

pub fn source_at(at: DateTime<Utc>) -> Source {
    let id = SourceId::new();
    Source {
        id,
        name: format!("GitHub {}", id),
        url: "https://github.com".to_string(),
        audit: Audit::created(CREATED_BY, at),
    }
}

pub fn repository_at(at: DateTime<Utc>, source_id: SourceId) -> Repository {
    let id = RepositoryId::new();
    Repository {
        id,
        name: "gitfyle".to_string(),
        owner: "gitfyle-org".to_string(),
        external_id: format!("R_{}", id),
        source_id,
        is_organization: Some(true),
        is_private: Some(false),
        token: None,
        token_expire_at: None,
        description: Some("Contribution tracking".to_string()),
        external_created_at: None,
        external_updated_at: None,
        audit: Audit::created(CREATED_BY, at),
    }
}

pub fn contributor_at(at: DateTime<Utc>, source_id: SourceId) -> Contributor {
    let id = ContributorId::new();
    Contributor {
        id,
        external_id: format!("U_{}", id),
        username: "octocat".to_string(),
        name: "The Octocat".to_string(),
        avatar_url: Some("https://avatars.example/octocat.png".to_string()),
        email: None,
        source_id,
        external_created_at: None,
        external_updated_at: None,
        audit: Audit::created(CREATED_BY, at),
    }
}

pub fn contribution_type_at(at: DateTime<Utc>) -> ContributionType {
    let id = ContributionTypeId::new();
    ContributionType {
        id,
        name: format!("pull_request {}", id),
        value: 5,
        audit: Audit::created(CREATED_BY, at),
    }
}

pub fn contribution_at(
    at: DateTime<Utc>,
    repository_id: RepositoryId,
    contributor_id: ContributorId,
    contribution_type_id: ContributionTypeId,
) -> Contribution {
    let id = ContributionId::new();
    Contribution {
        id,
        repository_id,
        contributor_id,
        contribution_type_id,
        external_id: format!("PR_{}", id),
        title: "Fix flaky retry test".to_string(),
        external_created_at: None,
        external_merged_at: None,
        audit: Audit::created(CREATED_BY, at),
    }
}

pub fn configuration_at(at: DateTime<Utc>) -> Configuration {
    let id = ConfigurationId::new();
    Configuration {
        id,
        name: format!("sync.interval {}", id),
        value: "15m".to_string(),
        audit: Audit::created(CREATED_BY, at),
    }
}
