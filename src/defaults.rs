#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Field-to-default tables applied to store records.
//!
//! Decoding a record never guesses: each entity has one table listing, per
//! column, the values to try in order when the column is missing, `null`, or
//! an empty string. The first candidate that produces a non-blank value wins.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    constants::{
        DEFAULT_COURSE_COLOR, DEFAULT_CREDITS, DEFAULT_GRADE_CATEGORIES_JSON, PRIORITY_MEDIUM,
        STATUS_PENDING,
    },
    entities::iso_timestamp,
    store::Record,
};

/// A candidate value for a blank column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// A fixed string.
    Text(&'static str),
    /// A fixed integer.
    Integer(i64),
    /// The value of another column of the same record, if that is not blank.
    CopyOf(&'static str),
    /// The current time as an ISO-8601 timestamp.
    Now,
}

/// The candidates for one column, tried in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefault {
    /// Column the defaults apply to.
    pub field:      &'static str,
    /// Candidates tried in order until one is not blank.
    pub candidates: &'static [DefaultValue],
}

/// A table of column defaults for one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefaults(pub &'static [FieldDefault]);

/// Whether a column counts as unset.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl FieldDefaults {
    /// Fills the blank columns of `record`, using the current time for `Now`.
    pub fn apply(&self, record: &mut Record) {
        self.apply_at(record, Utc::now());
    }

    /// Fills the blank columns of `record`, using `now` for `Now`.
    pub fn apply_at(&self, record: &mut Record, now: DateTime<Utc>) {
        for entry in self.0 {
            if !is_blank(record.get(entry.field)) {
                continue;
            }
            let value = entry.candidates.iter().find_map(|candidate| match candidate {
                DefaultValue::Text(s) => Some(Value::from(*s)),
                DefaultValue::Integer(n) => Some(Value::from(*n)),
                DefaultValue::CopyOf(other) => {
                    record.get(*other).filter(|v| !is_blank(Some(v))).cloned()
                }
                DefaultValue::Now => Some(Value::from(iso_timestamp(now))),
            });
            if let Some(value) = value {
                record.insert(entry.field.to_string(), value);
            }
        }
    }
}

use DefaultValue::{CopyOf, Integer, Now, Text};

/// Defaults applied when decoding assignment records.
pub const ASSIGNMENT_DEFAULTS: FieldDefaults = FieldDefaults(&[
    FieldDefault {
        field:      "title_c",
        candidates: &[CopyOf("Name"), Text("")],
    },
    FieldDefault {
        field:      "due_date_c",
        candidates: &[Now],
    },
    FieldDefault {
        field:      "priority_c",
        candidates: &[Text(PRIORITY_MEDIUM)],
    },
    FieldDefault {
        field:      "status_c",
        candidates: &[Text(STATUS_PENDING)],
    },
    FieldDefault {
        field:      "notes_c",
        candidates: &[Text("")],
    },
]);

/// Defaults applied to assignment records before they are created.
pub const ASSIGNMENT_CREATE_DEFAULTS: FieldDefaults = FieldDefaults(&[
    FieldDefault {
        field:      "status_c",
        candidates: &[Text(STATUS_PENDING)],
    },
    FieldDefault {
        field:      "notes_c",
        candidates: &[Text("")],
    },
]);

/// Defaults applied when decoding course records.
pub const COURSE_DEFAULTS: FieldDefaults = FieldDefaults(&[
    FieldDefault {
        field:      "name_c",
        candidates: &[CopyOf("Name"), Text("")],
    },
    FieldDefault {
        field:      "code_c",
        candidates: &[Text("")],
    },
    FieldDefault {
        field:      "instructor_c",
        candidates: &[Text("")],
    },
    FieldDefault {
        field:      "credits_c",
        candidates: &[Integer(DEFAULT_CREDITS)],
    },
    FieldDefault {
        field:      "color_c",
        candidates: &[Text(DEFAULT_COURSE_COLOR)],
    },
    FieldDefault {
        field:      "schedule_c",
        candidates: &[Text("")],
    },
    FieldDefault {
        field:      "current_grade_c",
        candidates: &[Integer(0)],
    },
    FieldDefault {
        field:      "grade_categories_c",
        candidates: &[Text(DEFAULT_GRADE_CATEGORIES_JSON)],
    },
]);

/// Defaults applied to course records before they are created.
pub const COURSE_CREATE_DEFAULTS: FieldDefaults = FieldDefaults(&[
    FieldDefault {
        field:      "current_grade_c",
        candidates: &[Integer(0)],
    },
    FieldDefault {
        field:      "grade_categories_c",
        candidates: &[Text(DEFAULT_GRADE_CATEGORIES_JSON)],
    },
]);

/// Defaults applied when decoding grade records.
pub const GRADE_DEFAULTS: FieldDefaults = FieldDefaults(&[
    FieldDefault {
        field:      "title_c",
        candidates: &[CopyOf("Name"), Text("")],
    },
    FieldDefault {
        field:      "category_c",
        candidates: &[Text("")],
    },
    FieldDefault {
        field:      "score_c",
        candidates: &[Integer(0)],
    },
    FieldDefault {
        field:      "weight_c",
        candidates: &[Integer(0)],
    },
    FieldDefault {
        field:      "date_c",
        candidates: &[Now],
    },
]);

/// Defaults applied to grade records before they are created.
pub const GRADE_CREATE_DEFAULTS: FieldDefaults = FieldDefaults(&[FieldDefault {
    field:      "date_c",
    candidates: &[Now],
}]);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn copy_of_falls_through_when_source_is_blank() {
        let mut with_name = record(json!({ "Name": "Essay", "title_c": "" }));
        let mut without_name = record(json!({ "Name": null }));
        ASSIGNMENT_DEFAULTS.apply(&mut with_name);
        ASSIGNMENT_DEFAULTS.apply(&mut without_name);
        assert_eq!(with_name["title_c"], json!("Essay"));
        assert_eq!(without_name["title_c"], json!(""));
    }

    #[test]
    fn present_values_are_left_alone() {
        let mut row = record(json!({ "priority_c": "high", "score_c": 0 }));
        ASSIGNMENT_DEFAULTS.apply(&mut row);
        GRADE_DEFAULTS.apply(&mut row);
        assert_eq!(row["priority_c"], json!("high"));
        assert_eq!(row["score_c"], json!(0));
        assert_eq!(row["status_c"], json!("pending"));
    }
}
