#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Assignment CRUD and due-date queries.
pub mod assignment;
/// Course CRUD and grade persistence.
pub mod course;
/// Grade CRUD and course-grade calculation.
pub mod grade;

pub use assignment::{AssignmentRepository, local_day_bounds};
pub use course::CourseRepository;
pub use grade::GradeRepository;
use serde::de::DeserializeOwned;

use crate::{
    defaults::FieldDefaults,
    entities::decode,
    store::{ID_FIELD, Record, StoreResult},
};

/// Decodes one record into the entity `T` through its store row `R`.
pub(crate) fn decode_one<R, T>(record: Record, defaults: &FieldDefaults) -> StoreResult<T>
where
    R: DeserializeOwned,
    T: From<R>,
{
    decode::<R>(record, defaults).map(T::from)
}

/// Decodes a list of records. Rows that cannot be decoded are logged and
/// skipped so one bad row does not hide the rest.
pub(crate) fn decode_many<R, T>(
    table: &str,
    records: Vec<Record>,
    defaults: &FieldDefaults,
) -> Vec<T>
where
    R: DeserializeOwned,
    T: From<R>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.get(ID_FIELD).cloned();
            match decode_one::<R, T>(record, defaults) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!("Skipping {table} record {}: {e}", id.unwrap_or_default());
                    None
                }
            }
        })
        .collect()
}
