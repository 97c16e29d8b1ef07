//! Tracing-backed logger for classified service failures.

use std::error::Error as StdError;

use tracing::error;

use super::BaseLogger;
use crate::foundation::ServiceError;

/// Emits one `tracing` error event per failure.
///
/// Critical failures carry `severity = "critical"` so subscribers can route
/// them to paging without parsing messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl BaseLogger for TracingLogger {
    fn log_error(&self, err: &ServiceError) {
        error!(
            severity = "error",
            entity = err.entity(),
            tier = %err.tier(),
            kind = err.fault().kind(),
            cause = %cause_chain(err),
            "{}",
            err
        );
    }

    fn log_critical(&self, err: &ServiceError) {
        error!(
            severity = "critical",
            entity = err.entity(),
            tier = %err.tier(),
            kind = err.fault().kind(),
            cause = %cause_chain(err),
            "{}",
            err
        );
    }
}

/// Messages of every error below `err`, outermost first, joined by ": ".
pub fn cause_chain(err: &(dyn StdError + 'static)) -> String {
    let mut messages = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        messages.push(cause.to_string());
        current = cause.source();
    }
    messages.join(": ")
}
