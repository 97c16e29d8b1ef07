//! Validation engine.
//!
//! Every rule is a small function that returns `Some(message)` on violation.
//! The engine evaluates all applicable rules for a record in one pass and
//! collects the violations into a [`ValidationReport`]; it never stops at the
//! first failing field.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::record::{is_unset, Field, Record};
use crate::common::Id;

/// Width of the trailing window a fresh timestamp must fall in.
pub const RECENCY_WINDOW_SECONDS: i64 = 60;

/// Field name → violation messages, in the order fields were first reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: IndexMap<&'static str, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Records `violation` against `field` if there is one.
    pub fn check(&mut self, field: &'static str, violation: Option<String>) {
        if let Some(message) = violation {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.errors.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    /// `Ok(())` when nothing was reported, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Rules
// =============================================================================

pub mod rules {
    use super::*;

    pub fn invalid_id(id: &Uuid) -> Option<String> {
        id.is_nil().then(|| "Id is invalid".to_string())
    }

    pub fn invalid_text(value: &str) -> Option<String> {
        value.trim().is_empty().then(|| "Text is required".to_string())
    }

    pub fn exceeds_max_length(value: &str, max_len: usize) -> Option<String> {
        (value.chars().count() > max_len)
            .then(|| format!("Text exceeds max length of {} characters", max_len))
    }

    pub fn invalid_date(date: &DateTime<Utc>) -> Option<String> {
        is_unset(date).then(|| "Date is invalid".to_string())
    }

    /// `now - 60s <= date <= now`. Unset dates are reported by [`invalid_date`].
    pub fn not_recent(date: &DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
        if is_unset(date) {
            return None;
        }

        let start = now - Duration::seconds(RECENCY_WINDOW_SECONDS);
        let end = now;

        (*date < start || *date > end).then(|| {
            format!(
                "Date is not recent. Expected a value between {} and {} but found {}",
                start, end, date
            )
        })
    }

    pub fn not_same_text(value: &str, other: &str, other_name: &str) -> Option<String> {
        (value != other).then(|| format!("Text is not the same as {}", other_name))
    }

    pub fn not_same_date(
        date: &DateTime<Utc>,
        other: &DateTime<Utc>,
        other_name: &str,
    ) -> Option<String> {
        (date != other).then(|| format!("Date is not the same as {}", other_name))
    }

    pub fn same_date(
        date: &DateTime<Utc>,
        other: &DateTime<Utc>,
        other_name: &str,
    ) -> Option<String> {
        (date == other).then(|| format!("Date is the same as {}", other_name))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Identity, entity rule table and audit presence.
fn check_shape<R: Record>(record: &R, report: &mut ValidationReport) {
    report.check("id", rules::invalid_id(record.id().as_uuid()));

    for field in record.fields() {
        match field {
            Field::Reference { name, value } => {
                report.check(name, rules::invalid_id(&value));
            }
            Field::Text {
                name,
                value,
                max_len,
            } => {
                report.check(name, rules::invalid_text(value));
                if let Some(max_len) = max_len {
                    report.check(name, rules::exceeds_max_length(value, max_len));
                }
            }
        }
    }

    let audit = record.audit();
    report.check("created_by", rules::invalid_text(&audit.created_by));
    report.check("updated_by", rules::invalid_text(&audit.updated_by));
    report.check("created_date", rules::invalid_date(&audit.created_date));
    report.check("updated_date", rules::invalid_date(&audit.updated_date));
}

/// Rules for a record about to be inserted.
pub fn validate_on_add<R: Record>(record: &R, now: DateTime<Utc>) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_shape(record, &mut report);

    let audit = record.audit();
    report.check(
        "updated_by",
        rules::not_same_text(&audit.updated_by, &audit.created_by, "created_by"),
    );
    report.check(
        "updated_date",
        rules::not_same_date(&audit.updated_date, &audit.created_date, "created_date"),
    );
    report.check("created_date", rules::not_recent(&audit.created_date, now));

    report
}

/// Rules a modification must satisfy on its own, before the stored twin is read.
pub fn validate_on_modify<R: Record>(record: &R, now: DateTime<Utc>) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_shape(record, &mut report);

    let audit = record.audit();
    report.check(
        "updated_date",
        rules::same_date(&audit.updated_date, &audit.created_date, "created_date"),
    );
    report.check("updated_date", rules::not_recent(&audit.updated_date, now));

    report
}

/// Rules a modification must satisfy against the currently stored record.
pub fn validate_against_storage<R: Record>(record: &R, stored: &R) -> ValidationReport {
    let mut report = ValidationReport::new();
    let (incoming, stored) = (record.audit(), stored.audit());

    report.check(
        "created_by",
        rules::not_same_text(&incoming.created_by, &stored.created_by, "created_by"),
    );
    report.check(
        "created_date",
        rules::not_same_date(&incoming.created_date, &stored.created_date, "created_date"),
    );
    report.check(
        "updated_date",
        rules::same_date(&incoming.updated_date, &stored.updated_date, "updated_date"),
    );

    report
}

/// Rule for operations addressed by identifier alone.
pub fn validate_id<T>(id: &Id<T>) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check("id", rules::invalid_id(id.as_uuid()));
    report
}
