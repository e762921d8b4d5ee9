#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Assignments and their drafts.
pub mod assignment;
/// Courses, their drafts, and grading categories.
pub mod course;
/// Grade records and their drafts.
pub mod grade;

pub use assignment::{Assignment, AssignmentDraft};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
pub use course::{Course, CourseDraft, GradeCategory};
pub use grade::{GradeDraft, GradeRecord};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    defaults::FieldDefaults,
    store::{ID_FIELD, Record, StoreResult},
};

/// Formats `t` the way the store expects timestamps: ISO-8601, UTC,
/// millisecond precision (`2024-03-02T10:00:00.000Z`).
pub fn iso_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Applies `defaults` to a raw store record and decodes it as `R`.
pub(crate) fn decode<R: DeserializeOwned>(
    mut record: Record,
    defaults: &FieldDefaults,
) -> StoreResult<R> {
    defaults.apply(&mut record);
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// Inserts `value` under `field` when present; absent values are left out of
/// the record so writes only touch what the caller set.
pub(crate) fn put<V: Into<Value>>(record: &mut Record, field: &str, value: Option<V>) {
    if let Some(value) = value {
        record.insert(field.to_string(), value.into());
    }
}

/// Reads an integer id out of a bare value.
fn id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserializes a reference column, which arrives either as an embedded
/// record (`{"Id": 3, "name_c": "..."}`) or as the bare id.
pub(crate) fn reference_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::Object(map) => map.get(ID_FIELD).and_then(id_of),
        other => id_of(other),
    }))
}

/// Reads a finite number out of a number or a numeric string.
fn number_of(value: Option<Value>) -> Option<f64> {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Deserializes a number that may be missing, `null`, a numeric string, or
/// something else entirely. Anything that is not a number reads as `0`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_of(value).unwrap_or_default())
}

/// Like [`lenient_number`], but anything that is not a number reads as
/// `None`.
pub(crate) fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_of(value))
}

/// Parses a stored timestamp: RFC 3339, a date-time without zone (taken as
/// UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = text.parse::<NaiveDateTime>() {
        return Some(t.and_utc());
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    text.parse::<NaiveDate>()
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Deserializes a timestamp column with [`parse_timestamp`]. A value that
/// is not a readable timestamp is logged and reads as the current time.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = value.as_ref().and_then(Value::as_str).and_then(parse_timestamp);
    Ok(parsed.unwrap_or_else(|| {
        let value = value.unwrap_or_default();
        tracing::warn!("Unreadable timestamp {value}; using the current time");
        Utc::now()
    }))
}
