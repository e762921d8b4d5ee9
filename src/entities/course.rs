#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_number, put};
use crate::{
    constants::DEFAULT_GRADE_CATEGORIES_JSON,
    store::{Record, StoreResult},
};

/// A named grading bucket and its weight in percentage points.
///
/// Weights are not required to sum to 100. A category whose `weight` is
/// missing or not a number reads as weight 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCategory {
    /// Matched exactly (case-sensitive) against `GradeRecord::category`
    #[serde(default)]
    pub name:   String,
    /// Percentage points
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: f64,
}

impl GradeCategory {
    /// Creates a new category.
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Categories used when a course has none configured: Exams 40,
/// Assignments 35, Participation 15, Projects 10.
pub fn default_grade_categories() -> Vec<GradeCategory> {
    parse_categories(Value::from(DEFAULT_GRADE_CATEGORIES_JSON))
}

/// Reads `grade_categories_c`, stored either as a JSON-encoded string or as
/// a JSON array. Malformed content is logged and reads as no categories.
pub(crate) fn parse_categories(value: Value) -> Vec<GradeCategory> {
    let parsed = match value {
        Value::Null => return Vec::new(),
        Value::String(s) if s.trim().is_empty() => return Vec::new(),
        Value::String(s) => serde_json::from_str(&s),
        other => serde_json::from_value(other),
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed grade categories: {e}");
        Vec::new()
    })
}

/// Splits a stored schedule (`"Mon 9:00, Wed 9:00"`) into its entries.
pub(crate) fn parse_schedule(schedule: &str) -> Vec<String> {
    schedule
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A course as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Store id
    #[serde(rename = "Id")]
    pub id:               i64,
    /// Course name, falling back to the record's `Name`
    pub name:             String,
    /// Course code, e.g. `PHYS 101`
    pub code:             String,
    /// Instructor
    pub instructor:       String,
    /// Credit hours; 3 when the column is blank. A stored 0 stays 0.
    pub credits:          i64,
    /// Display color
    pub color:            String,
    /// Meeting times
    pub schedule:         Vec<String>,
    /// Last computed overall grade
    pub current_grade:    f64,
    /// Weighted grading categories
    pub grade_categories: Vec<GradeCategory>,
}

/// Store-side shape of a course record, after defaults are applied.
#[derive(Deserialize)]
pub(crate) struct CourseRow {
    /// `Id`
    #[serde(rename = "Id")]
    id:                 i64,
    /// `name_c`
    name_c:             String,
    /// `code_c`
    code_c:             String,
    /// `instructor_c`
    instructor_c:       String,
    /// `credits_c`; only blank values get the default, not 0
    #[serde(deserialize_with = "lenient_number")]
    credits_c:          f64,
    /// `color_c`
    color_c:            String,
    /// `schedule_c`, comma separated
    schedule_c:         String,
    /// `current_grade_c`
    #[serde(deserialize_with = "lenient_number")]
    current_grade_c:    f64,
    /// `grade_categories_c`, JSON
    grade_categories_c: Value,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id:               row.id,
            name:             row.name_c,
            code:             row.code_c,
            instructor:       row.instructor_c,
            credits:          row.credits_c.round() as i64,
            color:            row.color_c,
            schedule:         parse_schedule(&row.schedule_c),
            current_grade:    row.current_grade_c,
            grade_categories: parse_categories(row.grade_categories_c),
        }
    }
}

/// Values for creating or updating a course. Unset members are left out of
/// the write.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct CourseDraft {
    /// Name; also written to `Name`
    #[builder(into)]
    pub name:             Option<String>,
    /// Course code
    #[builder(into)]
    pub code:             Option<String>,
    /// Instructor
    #[builder(into)]
    pub instructor:       Option<String>,
    /// Credit hours
    pub credits:          Option<i64>,
    /// Display color
    #[builder(into)]
    pub color:            Option<String>,
    /// Meeting times, stored joined with `", "`
    pub schedule:         Option<Vec<String>>,
    /// Overall grade
    pub current_grade:    Option<f64>,
    /// Grading categories, stored as JSON
    pub grade_categories: Option<Vec<GradeCategory>>,
}

impl CourseDraft {
    /// Converts the draft into store columns.
    pub(crate) fn to_record(&self) -> StoreResult<Record> {
        let mut record = Record::new();
        put(&mut record, "Name", self.name.clone());
        put(&mut record, "name_c", self.name.clone());
        put(&mut record, "code_c", self.code.clone());
        put(&mut record, "instructor_c", self.instructor.clone());
        put(&mut record, "credits_c", self.credits);
        put(&mut record, "color_c", self.color.clone());
        put(&mut record, "schedule_c", self.schedule.as_ref().map(|s| s.iter().join(", ")));
        put(&mut record, "current_grade_c", self.current_grade);
        let categories = self
            .grade_categories
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        put(&mut record, "grade_categories_c", categories);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_cover_four_categories() {
        let categories = default_grade_categories();
        assert_eq!(
            categories,
            vec![
                GradeCategory::new("Exams", 40.0),
                GradeCategory::new("Assignments", 35.0),
                GradeCategory::new("Participation", 15.0),
                GradeCategory::new("Projects", 10.0),
            ]
        );
    }

    #[test]
    fn categories_missing_weight_read_as_zero() {
        let stored = r#"[{"name":"Labs"},{"name":"Quiz","weight":"20"}]"#;
        let categories = parse_categories(json!(stored));
        assert_eq!(
            categories,
            vec![GradeCategory::new("Labs", 0.0), GradeCategory::new("Quiz", 20.0)]
        );
    }

    #[test]
    fn malformed_categories_read_as_none() {
        assert!(parse_categories(json!("{not json")).is_empty());
        assert!(parse_categories(json!("")).is_empty());
        assert!(parse_categories(Value::Null).is_empty());
    }

    #[test]
    fn inline_category_arrays_are_accepted() {
        let categories = parse_categories(json!([{ "name": "Exams", "weight": 100 }]));
        assert_eq!(categories, vec![GradeCategory::new("Exams", 100.0)]);
    }

    #[test]
    fn schedule_round_trips_through_the_stored_form() {
        assert_eq!(
            parse_schedule("Mon 9:00,  Wed 9:00 ,,Fri"),
            vec!["Mon 9:00", "Wed 9:00", "Fri"]
        );
        let record = CourseDraft::builder()
            .schedule(vec!["Tue 14:00".to_string(), "Thu 14:00".to_string()])
            .build()
            .to_record()
            .expect("record");
        assert_eq!(record["schedule_c"], json!("Tue 14:00, Thu 14:00"));
    }
}
