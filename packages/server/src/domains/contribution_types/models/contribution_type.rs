use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{nullable_text, ContributionTypeId};
use crate::foundation::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
use crate::kernel::PgRecord;

/// ContributionType - a kind of contribution ("pull request", "issue", ...) and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContributionType {
    pub id: ContributionTypeId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(default)]
    pub value: i32,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for ContributionType {
    const NAME: &'static str = "ContributionType";

    fn id(&self) -> ContributionTypeId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("name", &self.name, DEFAULT_TEXT_MAX_LEN)]
    }
}

#[async_trait]
impl PgRecord for ContributionType {
    const TABLE: &'static str = "contribution_types";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO contribution_types (id, name, value, created_by, created_date, updated_by, updated_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(self.value)
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
            UPDATE contribution_types
            SET name = $2, value = $3, updated_by = $4, updated_date = $5
            WHERE id = $1 AND updated_date < $5
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(self.value)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}
