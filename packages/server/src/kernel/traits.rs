// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation and fault classification live in the foundation layer and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseClock, BaseLogger)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::foundation::ServiceError;

// =============================================================================
// Clock Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseClock: Send + Sync {
    /// Current instant, consulted at most once per add/modify
    async fn now(&self) -> Result<DateTime<Utc>>;
}

// =============================================================================
// Logger Trait (Infrastructure)
// =============================================================================

/// Sink for classified service failures. Each failure reaches exactly one method once.
pub trait BaseLogger: Send + Sync {
    fn log_error(&self, error: &ServiceError);

    /// Infrastructure distress (storage unreachable)
    fn log_critical(&self, error: &ServiceError);
}
