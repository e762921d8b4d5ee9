#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde_json::json;

use super::{decode_many, decode_one};
use crate::{
    constants::{ASSIGNMENT_TABLE, COURSE_REFERENCE_FIELD, STATUS_COMPLETED},
    defaults::{ASSIGNMENT_CREATE_DEFAULTS, ASSIGNMENT_DEFAULTS},
    entities::{Assignment, AssignmentDraft, assignment::AssignmentRow, iso_timestamp},
    store::{FetchParams, FieldSpec, Operator, Record, RecordStore, StoreResult},
};

/// Columns read for an assignment. With `expand_course`, the course reference
/// comes back embedded with the course name.
fn fields(expand_course: bool) -> FetchParams {
    let course = if expand_course {
        FieldSpec::reference("course_id_c", COURSE_REFERENCE_FIELD)
    } else {
        FieldSpec::new("course_id_c")
    };
    FetchParams::new([
        FieldSpec::new("Name"),
        FieldSpec::new("title_c"),
        FieldSpec::new("due_date_c"),
        FieldSpec::new("priority_c"),
        FieldSpec::new("status_c"),
        FieldSpec::new("grade_c"),
        FieldSpec::new("notes_c"),
        course,
    ])
}

/// Start and end, in UTC, of the local calendar day `date`.
///
/// A midnight that falls in a DST gap is taken as UTC midnight.
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let to_utc = |day: NaiveDate| {
        let naive = day.and_time(NaiveTime::MIN);
        naive
            .and_local_timezone(Local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc())
    };
    let next = date.succ_opt().unwrap_or(NaiveDate::MAX);
    (to_utc(date), to_utc(next))
}

/// Reads and writes assignment records.
#[derive(Clone)]
pub struct AssignmentRepository {
    /// Backing record store.
    store: Arc<dyn RecordStore>,
}

impl AssignmentRepository {
    /// Creates a repository over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Decodes a list of assignment records.
    fn decode_list(records: Vec<Record>) -> Vec<Assignment> {
        decode_many::<AssignmentRow, Assignment>(ASSIGNMENT_TABLE, records, &ASSIGNMENT_DEFAULTS)
    }

    /// Decodes a single assignment record.
    fn decode(record: Record) -> StoreResult<Assignment> {
        decode_one::<AssignmentRow, Assignment>(record, &ASSIGNMENT_DEFAULTS)
    }

    /// Returns every assignment.
    pub async fn get_all(&self) -> StoreResult<Vec<Assignment>> {
        let records = self.store.fetch_records(ASSIGNMENT_TABLE, &fields(true)).await?;
        Ok(Self::decode_list(records))
    }

    /// Returns the assignment with `id`, if it exists.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Assignment>> {
        self.store
            .get_record_by_id(ASSIGNMENT_TABLE, id, &fields(true))
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Returns the assignments of one course.
    pub async fn get_by_course_id(&self, course_id: i64) -> StoreResult<Vec<Assignment>> {
        let params = fields(false).filter("course_id_c", Operator::EqualTo, course_id);
        let records = self.store.fetch_records(ASSIGNMENT_TABLE, &params).await?;
        Ok(Self::decode_list(records))
    }

    /// Returns the open assignments due within the next `days` days.
    pub async fn get_upcoming(&self, days: i64) -> StoreResult<Vec<Assignment>> {
        self.get_upcoming_from(Utc::now(), days).await
    }

    /// Returns the open assignments due between `now` and `days` days later,
    /// both ends inclusive.
    pub async fn get_upcoming_from(
        &self,
        now: DateTime<Utc>,
        days: i64,
    ) -> StoreResult<Vec<Assignment>> {
        let until = TimeDelta::try_days(days)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let params = fields(false)
            .filter("due_date_c", Operator::GreaterThanOrEqualTo, iso_timestamp(now))
            .filter("due_date_c", Operator::LessThanOrEqualTo, iso_timestamp(until))
            .filter("status_c", Operator::NotEqualTo, STATUS_COMPLETED);
        let records = self.store.fetch_records(ASSIGNMENT_TABLE, &params).await?;
        Ok(Self::decode_list(records))
    }

    /// Returns the open assignments due today, in local time.
    pub async fn get_todays_tasks(&self) -> StoreResult<Vec<Assignment>> {
        let (start, end) = local_day_bounds(Local::now().date_naive());
        self.get_due_between(start, end).await
    }

    /// Returns the open assignments due in `[start, end)`.
    pub async fn get_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Assignment>> {
        let params = fields(false)
            .filter("due_date_c", Operator::GreaterThanOrEqualTo, iso_timestamp(start))
            .filter("due_date_c", Operator::LessThan, iso_timestamp(end))
            .filter("status_c", Operator::NotEqualTo, STATUS_COMPLETED);
        let records = self.store.fetch_records(ASSIGNMENT_TABLE, &params).await?;
        Ok(Self::decode_list(records))
    }

    /// Creates an assignment. Status defaults to `pending` and notes to empty.
    pub async fn create(&self, draft: &AssignmentDraft) -> StoreResult<Assignment> {
        let mut record = draft.to_record();
        ASSIGNMENT_CREATE_DEFAULTS.apply(&mut record);
        let created = self.store.create_record(ASSIGNMENT_TABLE, record).await?;
        Self::decode(created)
    }

    /// Writes the set members of `draft` to the assignment with `id`.
    pub async fn update(&self, id: i64, draft: &AssignmentDraft) -> StoreResult<Assignment> {
        let updated = self
            .store
            .update_record(ASSIGNMENT_TABLE, id, draft.to_record())
            .await?;
        Self::decode(updated)
    }

    /// Deletes the assignment with `id`.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.store.delete_records(ASSIGNMENT_TABLE, &[id]).await
    }

    /// Sets the status of the assignment with `id`.
    pub async fn update_status(&self, id: i64, status: &str) -> StoreResult<Assignment> {
        let mut record = Record::new();
        record.insert("status_c".to_string(), json!(status));
        let updated = self.store.update_record(ASSIGNMENT_TABLE, id, record).await?;
        Self::decode(updated)
    }
}
