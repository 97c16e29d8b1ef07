//! Postgres persistence gateway.
//!
//! `PgStore` implements [`BaseStore`] for every record that knows its table
//! and how to write its own columns ([`PgRecord`]). Reads and deletes are
//! generic over the table name.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::FromRow;

use super::store::{BaseStore, StoreFault};
use crate::common::Id;
use crate::config::Config;
use crate::foundation::Record;

/// A record with a Postgres table of its own.
#[async_trait]
pub trait PgRecord: Record + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;

    /// INSERT ... RETURNING *
    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error>;

    /// UPDATE ... RETURNING *, guarded by `updated_date < $new`.
    ///
    /// `Ok(None)` when the row is gone or already carries a stamp at least as
    /// new as this one. Stamps are compared at microsecond precision, so two
    /// stamps inside the same microsecond count as equal.
    async fn update_row(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error>;
}

/// Connects a pool sized from `config`.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Runs the embedded migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<R: PgRecord> BaseStore<R> for PgStore {
    async fn insert(&self, record: R) -> Result<R, StoreFault> {
        Ok(record.insert_row(&self.pool).await?)
    }

    async fn select_all(&self) -> Result<Vec<R>, StoreFault> {
        let sql = format!("SELECT * FROM {} ORDER BY created_date, id", R::TABLE);
        let rows = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn select_by_id(&self, id: Id<R>) -> Result<Option<R>, StoreFault> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
        let row = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, record: R) -> Result<R, StoreFault> {
        record.update_row(&self.pool).await?.ok_or_else(|| {
            StoreFault::Concurrency(anyhow!(
                "{} {} was changed or removed concurrently",
                R::NAME,
                record.id()
            ))
        })
    }

    async fn delete(&self, record: R) -> Result<R, StoreFault> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING *", R::TABLE);
        sqlx::query_as::<_, R>(&sql)
            .bind(record.id())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                StoreFault::Concurrency(anyhow!(
                    "{} {} was removed concurrently",
                    R::NAME,
                    record.id()
                ))
            })
    }
}
