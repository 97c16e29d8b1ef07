use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{nullable_text, SourceId};
use crate::foundation::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
use crate::kernel::PgRecord;

/// Source - a code hosting platform contributions are collected from (GitHub, GitLab, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Source {
    pub id: SourceId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub url: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for Source {
    const NAME: &'static str = "Source";

    fn id(&self) -> SourceId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("name", &self.name, DEFAULT_TEXT_MAX_LEN),
            Field::text("url", &self.url, DEFAULT_TEXT_MAX_LEN),
        ]
    }
}

#[async_trait]
impl PgRecord for Source {
    const TABLE: &'static str = "sources";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO sources (id, name, url, created_by, created_date, updated_by, updated_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.url)
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
            UPDATE sources
            SET name = $2, url = $3, updated_by = $4, updated_date = $5
            WHERE id = $1 AND updated_date < $5
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.url)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}
