//! Wall clock adapter.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use super::BaseClock;

/// Reads the system clock, truncated to the microsecond precision Postgres
/// stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl BaseClock for SystemClock {
    async fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now().trunc_subsecs(6))
    }
}
