//! Record shape shared by every tracked entity.
//!
//! Each entity (Source, Repository, Contributor, ContributionType,
//! Contribution, Configuration) implements [`Record`] and hands the validation
//! engine a small rule table describing its own columns. Identity and audit
//! columns are common to every record and are checked by the engine itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::common::{nullable_text, Id};

/// Default maximum length of short text columns (names, titles, external ids).
pub const DEFAULT_TEXT_MAX_LEN: usize = 255;

/// Creation and modification provenance carried by every record.
///
/// `created_*` is written once when the record is added and never changes.
/// `updated_*` moves forward on every successful modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Audit {
    #[serde(default, deserialize_with = "nullable_text")]
    pub created_by: String,
    #[serde(default)]
    pub created_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub updated_by: String,
    #[serde(default)]
    pub updated_date: DateTime<Utc>,
}

impl Audit {
    /// Audit trail for a record being created by `by` at `at`.
    pub fn created(by: impl Into<String>, at: DateTime<Utc>) -> Self {
        let by = by.into();
        Self {
            created_by: by.clone(),
            created_date: at,
            updated_by: by,
            updated_date: at,
        }
    }

    /// Copy of this trail with the modification stamp moved to (`by`, `at`).
    pub fn touched(&self, by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            created_by: self.created_by.clone(),
            created_date: self.created_date,
            updated_by: by.into(),
            updated_date: at,
        }
    }
}

/// Returns true when a timestamp was never set (the chrono default, Unix epoch).
pub fn is_unset(date: &DateTime<Utc>) -> bool {
    *date == DateTime::<Utc>::default()
}

/// One entry of an entity's rule table.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    /// Identifier of another record; must not be nil.
    Reference { name: &'static str, value: Uuid },
    /// Required text; must not be blank and must fit in `max_len` characters.
    Text {
        name: &'static str,
        value: &'a str,
        max_len: Option<usize>,
    },
}

impl<'a> Field<'a> {
    pub fn reference<T>(name: &'static str, value: &Id<T>) -> Self {
        Field::Reference {
            name,
            value: *value.as_uuid(),
        }
    }

    /// Required text bounded by `max_len` characters.
    pub fn text(name: &'static str, value: &'a str, max_len: usize) -> Self {
        Field::Text {
            name,
            value,
            max_len: Some(max_len),
        }
    }

    /// Required text with no length limit.
    pub fn unbounded_text(name: &'static str, value: &'a str) -> Self {
        Field::Text {
            name,
            value,
            max_len: None,
        }
    }
}

/// A persisted entity managed by a [`FoundationService`](super::FoundationService).
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Entity name used in fault messages ("Source", "ContributionType", ...).
    const NAME: &'static str;

    fn id(&self) -> Id<Self>;

    fn audit(&self) -> &Audit;

    /// Entity-specific rule table, in reporting order.
    fn fields(&self) -> Vec<Field<'_>>;
}
