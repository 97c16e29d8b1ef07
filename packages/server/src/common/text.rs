//! Serde helpers for required text columns.

use serde::{Deserialize, Deserializer};

/// Deserializes a required text field, mapping JSON `null` to an empty string.
///
/// The validation engine then reports the field as required.
pub fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
