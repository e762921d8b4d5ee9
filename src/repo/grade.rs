#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use super::{decode_many, decode_one};
use crate::{
    aggregate::compute_course_grade,
    constants::{COURSE_REFERENCE_FIELD, GRADE_TABLE},
    defaults::{GRADE_CREATE_DEFAULTS, GRADE_DEFAULTS},
    entities::{GradeCategory, GradeDraft, GradeRecord, grade::GradeRow},
    store::{FetchParams, FieldSpec, Operator, OrSentinel, Record, RecordStore, StoreResult},
};

/// Columns read for a grade. With `expand_course`, the course reference comes
/// back embedded with the course name.
fn fields(expand_course: bool) -> FetchParams {
    let course = if expand_course {
        FieldSpec::reference("course_id_c", COURSE_REFERENCE_FIELD)
    } else {
        FieldSpec::new("course_id_c")
    };
    FetchParams::new([
        FieldSpec::new("Name"),
        FieldSpec::new("category_c"),
        FieldSpec::new("score_c"),
        FieldSpec::new("weight_c"),
        FieldSpec::new("date_c"),
        FieldSpec::new("title_c"),
        course,
    ])
}

/// Reads and writes grade records.
#[derive(Clone)]
pub struct GradeRepository {
    /// Backing record store.
    store: Arc<dyn RecordStore>,
}

impl GradeRepository {
    /// Creates a repository over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Decodes a list of grade records.
    fn decode_list(records: Vec<Record>) -> Vec<GradeRecord> {
        decode_many::<GradeRow, GradeRecord>(GRADE_TABLE, records, &GRADE_DEFAULTS)
    }

    /// Decodes a single grade record.
    fn decode(record: Record) -> StoreResult<GradeRecord> {
        decode_one::<GradeRow, GradeRecord>(record, &GRADE_DEFAULTS)
    }

    /// Returns every grade.
    pub async fn get_all(&self) -> StoreResult<Vec<GradeRecord>> {
        let records = self.store.fetch_records(GRADE_TABLE, &fields(true)).await?;
        Ok(Self::decode_list(records))
    }

    /// Returns the grade with `id`, if it exists.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<GradeRecord>> {
        self.store
            .get_record_by_id(GRADE_TABLE, id, &fields(true))
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Returns the grades recorded for one course.
    pub async fn get_by_course_id(&self, course_id: i64) -> StoreResult<Vec<GradeRecord>> {
        let params = fields(false).filter("course_id_c", Operator::EqualTo, course_id);
        let records = self.store.fetch_records(GRADE_TABLE, &params).await?;
        Ok(Self::decode_list(records))
    }

    /// Creates a grade. The date defaults to now.
    pub async fn create(&self, draft: &GradeDraft) -> StoreResult<GradeRecord> {
        let mut record = draft.to_record();
        GRADE_CREATE_DEFAULTS.apply(&mut record);
        let created = self.store.create_record(GRADE_TABLE, record).await?;
        Self::decode(created)
    }

    /// Writes the set members of `draft` to the grade with `id`.
    pub async fn update(&self, id: i64, draft: &GradeDraft) -> StoreResult<GradeRecord> {
        let updated = self
            .store
            .update_record(GRADE_TABLE, id, draft.to_record())
            .await?;
        Self::decode(updated)
    }

    /// Deletes the grade with `id`.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.store.delete_records(GRADE_TABLE, &[id]).await
    }

    /// Computes the overall grade of a course from its stored grades and the
    /// given categories. See [`compute_course_grade`].
    ///
    /// Never fails: if the grades cannot be read, the failure is logged and
    /// the course is graded as having no grades (0).
    pub async fn calculate_course_grade(
        &self,
        course_id: i64,
        categories: &[GradeCategory],
    ) -> i64 {
        let grades = self
            .get_by_course_id(course_id)
            .await
            .or_sentinel("Error fetching grades by course ID");
        compute_course_grade(&grades, categories)
    }
}
