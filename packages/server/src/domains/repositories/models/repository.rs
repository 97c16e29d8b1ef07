use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{nullable_text, RepositoryId, SourceId};
use crate::foundation::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
use crate::kernel::PgRecord;

/// Repository - a code repository hosted on a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Repository {
    pub id: RepositoryId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub owner: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub external_id: String,
    pub source_id: SourceId,
    #[serde(default)]
    pub is_organization: Option<bool>,
    #[serde(default)]
    pub is_private: Option<bool>,
    /// Access token used to read the repository from its source
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_expire_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for Repository {
    const NAME: &'static str = "Repository";

    fn id(&self) -> RepositoryId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("name", &self.name, DEFAULT_TEXT_MAX_LEN),
            Field::text("owner", &self.owner, DEFAULT_TEXT_MAX_LEN),
            Field::text("external_id", &self.external_id, DEFAULT_TEXT_MAX_LEN),
            Field::reference("source_id", &self.source_id),
        ]
    }
}

#[async_trait]
impl PgRecord for Repository {
    const TABLE: &'static str = "repositories";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO repositories (
                id, name, owner, external_id, source_id, is_organization, is_private,
                token, token_expire_at, description, external_created_at, external_updated_at,
                created_by, created_date, updated_by, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.owner)
        .bind(&self.external_id)
        .bind(self.source_id)
        .bind(self.is_organization)
        .bind(self.is_private)
        .bind(&self.token)
        .bind(self.token_expire_at)
        .bind(&self.description)
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
            UPDATE repositories
            SET name = $2, owner = $3, external_id = $4, source_id = $5,
                is_organization = $6, is_private = $7, token = $8, token_expire_at = $9,
                description = $10, external_created_at = $11, external_updated_at = $12,
                updated_by = $13, updated_date = $14
            WHERE id = $1 AND updated_date < $14
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.owner)
        .bind(&self.external_id)
        .bind(self.source_id)
        .bind(self.is_organization)
        .bind(self.is_private)
        .bind(&self.token)
        .bind(self.token_expire_at)
        .bind(&self.description)
        .bind(self.external_created_at)
        .bind(self.external_updated_at)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}
