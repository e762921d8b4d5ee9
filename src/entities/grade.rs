#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{iso_timestamp, lenient_number, lenient_timestamp, put, reference_id};
use crate::store::Record;

/// One recorded grade within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    /// Store id
    #[serde(rename = "Id")]
    pub id:        i64,
    /// Title, falling back to the record's `Name`
    pub title:     String,
    /// Name of the grading category this grade counts towards
    pub category:  String,
    /// Score, nominally 0-100
    pub score:     f64,
    /// Per-record weight; aggregation uses the category weight instead
    pub weight:    f64,
    /// When the grade was recorded
    pub date:      DateTime<Utc>,
    /// Course the grade belongs to
    pub course_id: Option<i64>,
}

/// Store-side shape of a grade record, after defaults are applied.
#[derive(Deserialize)]
pub(crate) struct GradeRow {
    /// `Id`
    #[serde(rename = "Id")]
    id:          i64,
    /// `title_c`
    title_c:     String,
    /// `category_c`
    category_c:  String,
    /// `score_c`
    #[serde(deserialize_with = "lenient_number")]
    score_c:     f64,
    /// `weight_c`
    #[serde(deserialize_with = "lenient_number")]
    weight_c:    f64,
    /// `date_c`
    #[serde(deserialize_with = "lenient_timestamp")]
    date_c:      DateTime<Utc>,
    /// `course_id_c`, embedded or bare
    #[serde(default, deserialize_with = "reference_id")]
    course_id_c: Option<i64>,
}

impl From<GradeRow> for GradeRecord {
    fn from(row: GradeRow) -> Self {
        Self {
            id:        row.id,
            title:     row.title_c,
            category:  row.category_c,
            score:     row.score_c,
            weight:    row.weight_c,
            date:      row.date_c,
            course_id: row.course_id_c,
        }
    }
}

/// Values for creating or updating a grade. Unset members are left out of the
/// write.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct GradeDraft {
    /// Title; also written to `Name`
    #[builder(into)]
    pub title:     Option<String>,
    /// Category name
    #[builder(into)]
    pub category:  Option<String>,
    /// Score
    pub score:     Option<f64>,
    /// Per-record weight
    pub weight:    Option<f64>,
    /// Date recorded
    pub date:      Option<DateTime<Utc>>,
    /// Owning course
    pub course_id: Option<i64>,
}

impl GradeDraft {
    /// Converts the draft into store columns.
    pub(crate) fn to_record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "Name", self.title.clone());
        put(&mut record, "title_c", self.title.clone());
        put(&mut record, "category_c", self.category.clone());
        put(&mut record, "score_c", self.score);
        put(&mut record, "weight_c", self.weight);
        put(&mut record, "date_c", self.date.map(iso_timestamp));
        put(&mut record, "course_id_c", self.course_id);
        record
    }
}
