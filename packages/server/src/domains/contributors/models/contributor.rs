use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{nullable_text, ContributorId, SourceId};
use crate::foundation::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
use crate::kernel::PgRecord;

/// Contributor - an account on a source that authors contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contributor {
    pub id: ContributorId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub external_id: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub source_id: SourceId,
    #[serde(default)]
    pub external_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for Contributor {
    const NAME: &'static str = "Contributor";

    fn id(&self) -> ContributorId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("external_id", &self.external_id, DEFAULT_TEXT_MAX_LEN),
            Field::text("username", &self.username, DEFAULT_TEXT_MAX_LEN),
            Field::text("name", &self.name, DEFAULT_TEXT_MAX_LEN),
            Field::reference("source_id", &self.source_id),
        ]
    }
}

#[async_trait]
impl PgRecord for Contributor {
    const TABLE: &'static str = "contributors";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO contributors (
                id, external_id, username, name, avatar_url, email, source_id,
                external_created_at, external_updated_at,
                created_by, created_date, updated_by, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.external_id)
        .bind(&self.username)
        .bind(&self.name)
        .bind(&self.avatar_url)
        .bind(&self.email)
        .bind(self.source_id)
        .bind(self.external_created_at)
        .bind(self.external_updated_at)
        .bind(&self.audit.created_by)
        .bind(self.audit.created_date)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_one(pool)
        .await
    }

    async fn update_row(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE contributors
            SET external_id = $2, username = $3, name = $4, avatar_url = $5, email = $6,
                source_id = $7, external_created_at = $8, external_updated_at = $9,
                updated_by = $10, updated_date = $11
            WHERE id = $1 AND updated_date < $11
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.external_id)
        .bind(&self.username)
        .bind(&self.name)
        .bind(&self.avatar_url)
        .bind(&self.email)
        .bind(self.source_id)
        .bind(self.external_created_at)
        .bind(self.external_updated_at)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}
