//! Fault taxonomy for foundation services.
//!
//! Every failed operation surfaces as one [`ServiceError`] whose [`FaultTier`]
//! tells callers what kind of response to give, without looking at message
//! text. The [`RecordFault`] inside names the specific condition and keeps
//! the original failure as its source.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::validation::ValidationReport;
use crate::kernel::StoreFault;

/// The four classes of failure a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultTier {
    /// Caller-correctable input defect (bad record, unknown id).
    Validation,
    /// Conflict with existing persisted state (duplicate, bad reference, lock).
    DependencyValidation,
    /// The backing store malfunctioned.
    Dependency,
    /// Anything unanticipated.
    Service,
}

impl fmt::Display for FaultTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultTier::Validation => write!(f, "validation"),
            FaultTier::DependencyValidation => write!(f, "dependency_validation"),
            FaultTier::Dependency => write!(f, "dependency"),
            FaultTier::Service => write!(f, "service"),
        }
    }
}

/// How loudly a fault is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Critical,
}

/// The specific condition behind a [`ServiceError`].
#[derive(Debug, Error)]
pub enum RecordFault {
    #[error("{entity} is null")]
    Null { entity: &'static str },

    #[error("{entity} is invalid, fix the errors and try again.")]
    Invalid {
        entity: &'static str,
        report: ValidationReport,
    },

    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} already exists error occurred.")]
    AlreadyExists {
        entity: &'static str,
        #[source]
        source: StoreFault,
    },

    #[error("Invalid reference {entity} error occurred.")]
    InvalidReference {
        entity: &'static str,
        #[source]
        source: StoreFault,
    },

    #[error("Locked {entity} record error occurred, please try again.")]
    Locked {
        entity: &'static str,
        #[source]
        source: StoreFault,
    },

    #[error("Failed storage {entity} error occurred, contact support.")]
    FailedStorage {
        entity: &'static str,
        #[source]
        source: StoreFault,
    },

    #[error("Failed operation {entity} error occurred, contact support.")]
    FailedOperation {
        entity: &'static str,
        #[source]
        source: StoreFault,
    },

    #[error("Failed service {entity} error occurred, contact support.")]
    FailedService {
        entity: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RecordFault {
    pub fn tier(&self) -> FaultTier {
        match self {
            RecordFault::Null { .. } | RecordFault::Invalid { .. } | RecordFault::NotFound { .. } => {
                FaultTier::Validation
            }
            RecordFault::AlreadyExists { .. }
            | RecordFault::InvalidReference { .. }
            | RecordFault::Locked { .. } => FaultTier::DependencyValidation,
            RecordFault::FailedStorage { .. } | RecordFault::FailedOperation { .. } => {
                FaultTier::Dependency
            }
            RecordFault::FailedService { .. } => FaultTier::Service,
        }
    }

    /// Storage that cannot be reached is infrastructure distress.
    pub fn severity(&self) -> Severity {
        match self {
            RecordFault::FailedStorage { .. } => Severity::Critical,
            _ => Severity::Error,
        }
    }

    /// Stable snake_case name of the condition, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordFault::Null { .. } => "null",
            RecordFault::Invalid { .. } => "invalid",
            RecordFault::NotFound { .. } => "not_found",
            RecordFault::AlreadyExists { .. } => "already_exists",
            RecordFault::InvalidReference { .. } => "invalid_reference",
            RecordFault::Locked { .. } => "locked",
            RecordFault::FailedStorage { .. } => "failed_storage",
            RecordFault::FailedOperation { .. } => "failed_operation",
            RecordFault::FailedService { .. } => "failed_service",
        }
    }

    /// Classifies a store failure for `entity`.
    pub fn from_store(entity: &'static str, fault: StoreFault) -> Self {
        match fault {
            StoreFault::DuplicateKey(_) => RecordFault::AlreadyExists {
                entity,
                source: fault,
            },
            StoreFault::InvalidReference(_) => RecordFault::InvalidReference {
                entity,
                source: fault,
            },
            StoreFault::Concurrency(_) => RecordFault::Locked {
                entity,
                source: fault,
            },
            StoreFault::Transient(_) => RecordFault::FailedStorage {
                entity,
                source: fault,
            },
            StoreFault::Operation(_) => RecordFault::FailedOperation {
                entity,
                source: fault,
            },
            StoreFault::Unexpected(source) => RecordFault::FailedService { entity, source },
        }
    }
}

/// A classified failure of one foundation service operation.
#[derive(Debug)]
pub struct ServiceError {
    entity: &'static str,
    fault: RecordFault,
}

impl ServiceError {
    pub fn new(entity: &'static str, fault: RecordFault) -> Self {
        Self { entity, fault }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn tier(&self) -> FaultTier {
        self.fault.tier()
    }

    pub fn severity(&self) -> Severity {
        self.fault.severity()
    }

    pub fn fault(&self) -> &RecordFault {
        &self.fault
    }

    /// Field violations, when the operation failed validation.
    pub fn report(&self) -> Option<&ValidationReport> {
        match &self.fault {
            RecordFault::Invalid { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.fault, RecordFault::NotFound { .. })
    }

    /// Conventional HTTP status for request layers mapping this error.
    pub fn status_code(&self) -> u16 {
        match &self.fault {
            RecordFault::NotFound { .. } => 404,
            RecordFault::InvalidReference { .. } => 424,
            RecordFault::Locked { .. } => 423,
            _ => match self.tier() {
                FaultTier::Validation => 400,
                FaultTier::DependencyValidation => 409,
                FaultTier::Dependency => 424,
                FaultTier::Service => 500,
            },
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier() {
            FaultTier::Validation => write!(
                f,
                "{} validation error occurred, fix errors and try again.",
                self.entity
            ),
            FaultTier::DependencyValidation => write!(
                f,
                "{} dependency validation error occurred, fix errors and try again.",
                self.entity
            ),
            FaultTier::Dependency => write!(
                f,
                "{} dependency error occurred, contact support.",
                self.entity
            ),
            FaultTier::Service => write!(f, "Service error occurred, contact support."),
        }
    }
}

impl StdError for ServiceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.fault)
    }
}
