use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{
    nullable_text, ContributionId, ContributionTypeId, ContributorId, RepositoryId,
};
use crate::foundation::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
use crate::kernel::PgRecord;

/// Contribution - one piece of work by a contributor in a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contribution {
    pub id: ContributionId,
    pub repository_id: RepositoryId,
    pub contributor_id: ContributorId,
    pub contribution_type_id: ContributionTypeId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub external_id: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub title: String,
    #[serde(default)]
    pub external_created_at: Option<DateTime<Utc>>,
    /// Set once the contribution was merged upstream
    #[serde(default)]
    pub external_merged_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for Contribution {
    const NAME: &'static str = "Contribution";

    fn id(&self) -> ContributionId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::reference("repository_id", &self.repository_id),
            Field::reference("contributor_id", &self.contributor_id),
            Field::reference("contribution_type_id", &self.contribution_type_id),
            Field::text("external_id", &self.external_id, DEFAULT_TEXT_MAX_LEN),
            Field::text("title", &self.title, DEFAULT_TEXT_MAX_LEN),
        ]
    }
}

#[async_trait]
impl PgRecord for Contribution {
    const TABLE: &'static str = "contributions";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO contributions (
                id, repository_id, contributor_id, contribution_type_id, external_id, title,
                external_created_at, external_merged_at,
                created_by, created_date, updated_by, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.repository_id)
        .bind(self.contributor_id)
        .bind(self.contribution_type_id)
        .bind(&self.external_id)
        .bind(&self.title)
        .bind(self.external_created_at)
        .bind(self.external_merged_at)
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
            UPDATE contributions
            SET repository_id = $2, contributor_id = $3, contribution_type_id = $4,
                external_id = $5, title = $6, external_created_at = $7, external_merged_at = $8,
                updated_by = $9, updated_date = $10
            WHERE id = $1 AND updated_date < $10
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.repository_id)
        .bind(self.contributor_id)
        .bind(self.contribution_type_id)
        .bind(&self.external_id)
        .bind(&self.title)
        .bind(self.external_created_at)
        .bind(self.external_merged_at)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}
