//! # coursebook
//!
//! Adapters between a generic remote record store and the shapes a course
//! planner UI works with: assignments, courses and grades. The one piece of
//! real arithmetic, the weighted course grade, lives in [`aggregate`].

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Weighted course-grade calculation
pub mod aggregate;
/// Runtime configuration from the environment
pub mod config;
/// Table names and fallback values
pub mod constants;
/// Field-to-default tables applied to store records
pub mod defaults;
/// Assignment, course and grade types and their store mappings
pub mod entities;
/// The three repositories bundled with course-grade bookkeeping
pub mod gradebook;
/// Repositories over the record store
pub mod repo;
/// The record store abstraction and its implementations
pub mod store;

pub use aggregate::compute_course_grade;
pub use config::Config;
pub use entities::{
    Assignment, AssignmentDraft, Course, CourseDraft, GradeCategory, GradeDraft, GradeRecord,
};
pub use gradebook::Gradebook;
pub use store::{MemoryStore, OrSentinel, PostgrestStore, RecordStore, StoreError, StoreResult};
