#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{iso_timestamp, lenient_optional_number, lenient_timestamp, put, reference_id};
use crate::store::Record;

/// An assignment as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Store id
    #[serde(rename = "Id")]
    pub id:        i64,
    /// Title, falling back to the record's `Name`
    pub title:     String,
    /// When the assignment is due
    pub due_date:  DateTime<Utc>,
    /// Free-form priority (`low`, `medium`, `high`)
    pub priority:  String,
    /// Free-form status (`pending`, `completed`, ...)
    pub status:    String,
    /// Grade received, if graded. A stored 0 reads as `Some(0.0)`.
    pub grade:     Option<f64>,
    /// Notes
    pub notes:     String,
    /// Course the assignment belongs to
    pub course_id: Option<i64>,
}

/// Store-side shape of an assignment record, after defaults are applied.
#[derive(Deserialize)]
pub(crate) struct AssignmentRow {
    /// `Id`
    #[serde(rename = "Id")]
    id:          i64,
    /// `title_c`
    title_c:     String,
    /// `due_date_c`
    #[serde(deserialize_with = "lenient_timestamp")]
    due_date_c:  DateTime<Utc>,
    /// `priority_c`
    priority_c:  String,
    /// `status_c`
    status_c:    String,
    /// `grade_c`; anything that is not a number reads as ungraded
    #[serde(default, deserialize_with = "lenient_optional_number")]
    grade_c:     Option<f64>,
    /// `notes_c`
    notes_c:     String,
    /// `course_id_c`, embedded or bare
    #[serde(default, deserialize_with = "reference_id")]
    course_id_c: Option<i64>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id:        row.id,
            title:     row.title_c,
            due_date:  row.due_date_c,
            priority:  row.priority_c,
            status:    row.status_c,
            grade:     row.grade_c,
            notes:     row.notes_c,
            course_id: row.course_id_c,
        }
    }
}

/// Values for creating or updating an assignment. Unset members are left out
/// of the write.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct AssignmentDraft {
    /// Title; also written to `Name`
    #[builder(into)]
    pub title:     Option<String>,
    /// Due date
    pub due_date:  Option<DateTime<Utc>>,
    /// Priority
    #[builder(into)]
    pub priority:  Option<String>,
    /// Status
    #[builder(into)]
    pub status:    Option<String>,
    /// Grade received
    pub grade:     Option<f64>,
    /// Notes
    #[builder(into)]
    pub notes:     Option<String>,
    /// Owning course
    pub course_id: Option<i64>,
}

impl AssignmentDraft {
    /// Converts the draft into store columns.
    pub(crate) fn to_record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "Name", self.title.clone());
        put(&mut record, "title_c", self.title.clone());
        put(&mut record, "due_date_c", self.due_date.map(iso_timestamp));
        put(&mut record, "priority_c", self.priority.clone());
        put(&mut record, "status_c", self.status.clone());
        put(&mut record, "grade_c", self.grade);
        put(&mut record, "notes_c", self.notes.clone());
        put(&mut record, "course_id_c", self.course_id);
        record
    }
}
