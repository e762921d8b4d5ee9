#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use serde_json::json;

use super::{decode_many, decode_one};
use crate::{
    constants::COURSE_TABLE,
    defaults::{COURSE_CREATE_DEFAULTS, COURSE_DEFAULTS},
    entities::{Course, CourseDraft, course::CourseRow},
    store::{FetchParams, FieldSpec, Record, RecordStore, StoreResult},
};

/// Columns read for a course.
fn fields() -> FetchParams {
    FetchParams::new([
        FieldSpec::new("Name"),
        FieldSpec::new("name_c"),
        FieldSpec::new("code_c"),
        FieldSpec::new("instructor_c"),
        FieldSpec::new("credits_c"),
        FieldSpec::new("color_c"),
        FieldSpec::new("schedule_c"),
        FieldSpec::new("current_grade_c"),
        FieldSpec::new("grade_categories_c"),
    ])
}

/// Reads and writes course records.
#[derive(Clone)]
pub struct CourseRepository {
    /// Backing record store.
    store: Arc<dyn RecordStore>,
}

impl CourseRepository {
    /// Creates a repository over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Decodes a single course record.
    fn decode(record: Record) -> StoreResult<Course> {
        decode_one::<CourseRow, Course>(record, &COURSE_DEFAULTS)
    }

    /// Returns every course. Courses without categories get the default set.
    pub async fn get_all(&self) -> StoreResult<Vec<Course>> {
        let records = self.store.fetch_records(COURSE_TABLE, &fields()).await?;
        Ok(decode_many::<CourseRow, Course>(COURSE_TABLE, records, &COURSE_DEFAULTS))
    }

    /// Returns the course with `id`, if it exists.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Course>> {
        self.store
            .get_record_by_id(COURSE_TABLE, id, &fields())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Creates a course. The overall grade starts at 0 and the default
    /// categories are stored when the draft has none.
    pub async fn create(&self, draft: &CourseDraft) -> StoreResult<Course> {
        let mut record = draft.to_record()?;
        COURSE_CREATE_DEFAULTS.apply(&mut record);
        let created = self.store.create_record(COURSE_TABLE, record).await?;
        Self::decode(created)
    }

    /// Writes the set members of `draft` to the course with `id`.
    pub async fn update(&self, id: i64, draft: &CourseDraft) -> StoreResult<Course> {
        let updated = self
            .store
            .update_record(COURSE_TABLE, id, draft.to_record()?)
            .await?;
        Self::decode(updated)
    }

    /// Deletes the course with `id`.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.store.delete_records(COURSE_TABLE, &[id]).await
    }

    /// Stores `grade` as the overall grade of the course with `id`.
    pub async fn update_grade(&self, id: i64, grade: i64) -> StoreResult<Course> {
        let mut record = Record::new();
        record.insert("current_grade_c".to_string(), json!(grade));
        let updated = self.store.update_record(COURSE_TABLE, id, record).await?;
        Self::decode(updated)
    }
}
