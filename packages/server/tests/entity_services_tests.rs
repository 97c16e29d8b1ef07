//! Every entity service shares the same foundation behavior; these tests
//! check each entity's own rule table and its wiring through ServerKernel.

mod common;

use anyhow::anyhow;
use chrono::Duration;
use provenance_core::common::{
    ConfigurationId, ContributionTypeId, ContributorId, RepositoryId, SourceId,
};
use provenance_core::domains::configurations::Configuration;
use provenance_core::domains::contributions::Contribution;
use provenance_core::foundation::{FaultTier, Severity};
use provenance_core::kernel::test_dependencies::{MockClock, MockStore, StoreCall, StoreOp};
use provenance_core::kernel::{StoreFault, TestDependencies};

use crate::common::{
    configuration_at, contribution_at, contribution_type_at, contributor_at, fixed_now,
    repository_at, source_at,
};

fn deps() -> TestDependencies {
    TestDependencies::new().mock_clock(MockClock::at(fixed_now()))
}

// =============================================================================
// Repository
// =============================================================================

#[tokio::test]
async fn repository_add_validates_its_fields() {
    let deps = deps();
    let kernel = deps.clone().into_kernel();

    let mut repository = repository_at(fixed_now(), SourceId::nil());
    repository.owner = String::new();
    repository.external_id = "x".repeat(256);

    let err = kernel.repositories.add(repository).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Repository validation error occurred, fix errors and try again."
    );
    let report = err.report().unwrap();
    assert_eq!(
        report.fields().collect::<Vec<_>>(),
        vec!["owner", "external_id", "source_id"]
    );
    assert_eq!(report.get("owner").unwrap(), ["Text is required"]);
    assert_eq!(
        report.get("external_id").unwrap(),
        ["Text exceeds max length of 255 characters"]
    );
    assert_eq!(report.get("source_id").unwrap(), ["Id is invalid"]);
    assert!(deps.repositories.calls().is_empty());
}

#[tokio::test]
async fn repository_with_unknown_source_is_an_invalid_reference() {
    let deps = deps().mock_repositories(MockStore::new().with_fault(
        StoreOp::Insert,
        StoreFault::InvalidReference(anyhow!("violates foreign key constraint")),
    ));
    let kernel = deps.clone().into_kernel();

    let err = kernel
        .repositories
        .add(repository_at(fixed_now(), SourceId::new()))
        .await
        .unwrap_err();

    assert_eq!(err.tier(), FaultTier::DependencyValidation);
    assert_eq!(
        err.fault().to_string(),
        "Invalid reference Repository error occurred."
    );
    assert_eq!(deps.logger.errors().len(), 1);
}

#[tokio::test]
async fn repository_moved_to_unknown_source_is_an_invalid_reference() {
    let stored = repository_at(fixed_now() - Duration::days(2), SourceId::new());
    let deps = deps().mock_repositories(
        MockStore::new().with_record(stored.clone()).with_fault(
            StoreOp::Update,
            StoreFault::InvalidReference(anyhow!("violates foreign key constraint")),
        ),
    );
    let kernel = deps.clone().into_kernel();

    let mut moved = stored.clone();
    moved.source_id = SourceId::new();
    moved.audit = stored.audit.touched("sync-bot", fixed_now());
    let err = kernel.repositories.modify(moved).await.unwrap_err();

    assert_eq!(err.tier(), FaultTier::DependencyValidation);
    assert_eq!(err.severity(), Severity::Error);
    assert_eq!(err.fault().kind(), "invalid_reference");
    assert_eq!(err.status_code(), 424);
    assert_eq!(deps.logger.count(), 1);
    assert_eq!(deps.logger.errors().len(), 1);
    assert_eq!(deps.repositories.rows(), vec![stored]);
}

#[tokio::test]
async fn repository_optional_fields_survive_modify() {
    let stored = repository_at(fixed_now() - Duration::days(2), SourceId::new());
    let deps = deps().mock_repositories(MockStore::new().with_record(stored.clone()));
    let kernel = deps.clone().into_kernel();

    let mut incoming = stored.clone();
    incoming.is_private = Some(true);
    incoming.token = Some("ghp_example".to_string());
    incoming.token_expire_at = Some(fixed_now() + Duration::days(30));
    incoming.audit = stored.audit.touched("sync-bot", fixed_now());

    let modified = kernel.repositories.modify(incoming.clone()).await.unwrap();

    assert_eq!(modified.token.as_deref(), Some("ghp_example"));
    assert_eq!(deps.repositories.rows(), vec![incoming]);
}

// =============================================================================
// Contributor
// =============================================================================

#[tokio::test]
async fn contributor_add_and_retrieve() {
    let deps = deps();
    let kernel = deps.clone().into_kernel();
    let contributor = contributor_at(fixed_now(), SourceId::new());

    kernel.contributors.add(contributor.clone()).await.unwrap();
    let retrieved = kernel
        .contributors
        .retrieve_by_id(contributor.id)
        .await
        .unwrap();

    assert_eq!(retrieved, contributor);
    assert_eq!(
        deps.contributors.calls(),
        vec![
            StoreCall::Insert(*contributor.id.as_uuid()),
            StoreCall::SelectById(*contributor.id.as_uuid()),
        ]
    );
}

#[tokio::test]
async fn contributor_requires_username_and_name() {
    let kernel = deps().into_kernel();
    let mut contributor = contributor_at(fixed_now(), SourceId::new());
    contributor.username = " ".to_string();
    contributor.name = String::new();

    let err = kernel.contributors.add(contributor).await.unwrap_err();

    let report = err.report().unwrap();
    assert_eq!(report.get("username").unwrap(), ["Text is required"]);
    assert_eq!(report.get("name").unwrap(), ["Text is required"]);
    assert_eq!(report.len(), 2);
}

#[tokio::test]
async fn contributor_remove_missing_is_not_found() {
    let kernel = deps().into_kernel();
    let id = ContributorId::new();

    let err = kernel.contributors.remove_by_id(id).await.unwrap_err();

    assert_eq!(
        err.fault().to_string(),
        format!("Contributor not found with id: {}", id)
    );
}

// =============================================================================
// ContributionType
// =============================================================================

#[tokio::test]
async fn contribution_type_value_is_not_validated() {
    let kernel = deps().into_kernel();
    let mut contribution_type = contribution_type_at(fixed_now());
    contribution_type.value = -1;

    let added = kernel
        .contribution_types
        .add(contribution_type)
        .await
        .unwrap();

    assert_eq!(added.value, -1);
}

#[tokio::test]
async fn contribution_type_storage_outage_names_the_entity() {
    let deps = deps().mock_contribution_types(MockStore::new().with_fault(
        StoreOp::SelectById,
        StoreFault::Transient(anyhow!("pool timed out")),
    ));
    let kernel = deps.clone().into_kernel();

    let err = kernel
        .contribution_types
        .retrieve_by_id(ContributionTypeId::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "ContributionType dependency error occurred, contact support."
    );
    assert_eq!(
        err.fault().to_string(),
        "Failed storage ContributionType error occurred, contact support."
    );
    let logged = deps.logger.criticals();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].entity, "ContributionType");
}

// =============================================================================
// Contribution
// =============================================================================

fn contribution() -> Contribution {
    contribution_at(
        fixed_now(),
        RepositoryId::new(),
        ContributorId::new(),
        ContributionTypeId::new(),
    )
}

#[tokio::test]
async fn contribution_add_checks_all_references() {
    let kernel = deps().into_kernel();
    let mut contribution = contribution();
    contribution.contributor_id = ContributorId::nil();
    contribution.title = String::new();

    let err = kernel.contributions.add(contribution).await.unwrap_err();

    let report = err.report().unwrap();
    assert_eq!(
        report.fields().collect::<Vec<_>>(),
        vec!["contributor_id", "title"]
    );
}

#[tokio::test]
async fn contribution_merge_is_recorded_by_modify() {
    let mut stored = contribution();
    stored.audit.created_date = fixed_now() - Duration::hours(3);
    stored.audit.updated_date = stored.audit.created_date;
    let deps = deps().mock_contributions(MockStore::new().with_record(stored.clone()));
    let kernel = deps.clone().into_kernel();

    let mut merged = stored.clone();
    merged.external_merged_at = Some(fixed_now() - Duration::minutes(1));
    merged.audit = stored.audit.touched("sync-bot", fixed_now());

    let modified = kernel.contributions.modify(merged).await.unwrap();

    assert!(modified.external_merged_at.is_some());
    assert_eq!(modified.audit.created_by, stored.audit.created_by);
    assert_eq!(deps.contributions.call_count(StoreOp::Update), 1);
}

#[tokio::test]
async fn contribution_retrieve_all() {
    let first = contribution();
    let second = contribution();
    let deps = deps().mock_contributions(
        MockStore::new()
            .with_record(first.clone())
            .with_record(second.clone()),
    );
    let kernel = deps.into_kernel();

    let all = kernel.contributions.retrieve_all().await.unwrap();

    assert_eq!(all, vec![first, second]);
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn configuration_allows_long_names_and_values() {
    let kernel = deps().into_kernel();
    let mut configuration = configuration_at(fixed_now());
    configuration.name = "n".repeat(450);
    configuration.value = "v".repeat(4096);

    assert!(kernel.configurations.add(configuration).await.is_ok());
}

#[tokio::test]
async fn configuration_requires_value() {
    let kernel = deps().into_kernel();
    let mut configuration = configuration_at(fixed_now());
    configuration.value = String::new();

    let err = kernel.configurations.add(configuration).await.unwrap_err();

    assert_eq!(
        err.report().unwrap().get("value").unwrap(),
        ["Text is required"]
    );
}

#[tokio::test]
async fn configuration_remove_nil_id_is_invalid() {
    let deps = deps();
    let kernel = deps.clone().into_kernel();

    let err = kernel
        .configurations
        .remove_by_id(ConfigurationId::nil())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Configuration validation error occurred, fix errors and try again."
    );
    assert!(deps.configurations.calls().is_empty());
}

// =============================================================================
// Shared wiring
// =============================================================================

#[tokio::test]
async fn services_share_one_logger_and_log_each_failure_once() {
    let deps = deps();
    let kernel = deps.clone().into_kernel();

    let _ = kernel.sources.retrieve_by_id(SourceId::new()).await;
    let _ = kernel.repositories.remove_by_id(RepositoryId::nil()).await;
    let _ = kernel.configurations.add(None::<Configuration>).await;

    let logged = deps.logger.entries();
    assert_eq!(
        logged.iter().map(|entry| entry.entity).collect::<Vec<_>>(),
        vec!["Source", "Repository", "Configuration"]
    );
    assert!(logged.iter().all(|entry| entry.tier == FaultTier::Validation));
    assert!(logged.iter().all(|entry| entry.severity == Severity::Error));
    assert_eq!(
        logged.iter().map(|entry| entry.kind).collect::<Vec<_>>(),
        vec!["not_found", "invalid", "null"]
    );
}

#[tokio::test]
async fn clock_is_read_once_per_write() {
    let deps = deps();
    let kernel = deps.clone().into_kernel();

    let source = source_at(fixed_now());
    kernel.sources.add(source.clone()).await.unwrap();
    kernel
        .repositories
        .add(repository_at(fixed_now(), source.id))
        .await
        .unwrap();

    deps.clock.set(fixed_now() + Duration::minutes(5));
    let err = kernel
        .contributors
        .add(contributor_at(fixed_now(), source.id))
        .await
        .unwrap_err();

    assert!(err.report().unwrap().contains("created_date"));
    assert_eq!(deps.clock.calls(), 3);
}
