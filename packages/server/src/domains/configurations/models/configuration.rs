use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{nullable_text, ConfigurationId};
use crate::foundation::{Audit, Field, Record};
use crate::kernel::PgRecord;

/// Configuration names are longer than other short text columns.
pub const CONFIGURATION_NAME_MAX_LEN: usize = 450;

/// Configuration - a free-form named setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Configuration {
    pub id: ConfigurationId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub value: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Record for Configuration {
    const NAME: &'static str = "Configuration";

    fn id(&self) -> ConfigurationId {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("name", &self.name, CONFIGURATION_NAME_MAX_LEN),
            Field::unbounded_text("value", &self.value),
        ]
    }
}

#[async_trait]
impl PgRecord for Configuration {
    const TABLE: &'static str = "configurations";

    async fn insert_row(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO configurations (id, name, value, created_by, created_date, updated_by, updated_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.value)
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
            UPDATE configurations
            SET name = $2, value = $3, updated_by = $4, updated_date = $5
            WHERE id = $1 AND updated_date < $5
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.value)
        .bind(&self.audit.updated_by)
        .bind(self.audit.updated_date)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::validation::validate_on_add;
    use chrono::Utc;

    fn configuration(name: String, value: String) -> Configuration {
        Configuration {
            id: ConfigurationId::new(),
            name,
            value,
            audit: Audit::created("alice", Utc::now()),
        }
    }

    #[test]
    fn test_name_allows_450_characters() {
        let record = configuration("n".repeat(450), "v".to_string());
        assert!(validate_on_add(&record, record.audit.created_date).is_empty());

        let record = configuration("n".repeat(451), "v".to_string());
        let report = validate_on_add(&record, record.audit.created_date);
        assert_eq!(
            report.get("name").unwrap(),
            ["Text exceeds max length of 450 characters"]
        );
    }

    #[test]
    fn test_value_has_no_length_limit() {
        let record = configuration("feature.sync".to_string(), "v".repeat(10_000));
        assert!(validate_on_add(&record, record.audit.created_date).is_empty());
    }
}
