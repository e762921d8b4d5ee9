#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use futures::future::join_all;

use crate::{
    entities::Course,
    repo::{AssignmentRepository, CourseRepository, GradeRepository},
    store::{RecordStore, StoreResult},
};

/// The three repositories over one shared store, plus the course-grade
/// bookkeeping that ties them together.
#[derive(Clone)]
pub struct Gradebook {
    /// Assignment records
    assignments: AssignmentRepository,
    /// Course records
    courses:     CourseRepository,
    /// Grade records
    grades:      GradeRepository,
}

impl Gradebook {
    /// Creates a gradebook whose repositories all use `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            assignments: AssignmentRepository::new(Arc::clone(&store)),
            courses:     CourseRepository::new(Arc::clone(&store)),
            grades:      GradeRepository::new(store),
        }
    }

    /// Returns the assignment repository.
    pub fn assignments(&self) -> &AssignmentRepository {
        &self.assignments
    }

    /// Returns the course repository.
    pub fn courses(&self) -> &CourseRepository {
        &self.courses
    }

    /// Returns the grade repository.
    pub fn grades(&self) -> &GradeRepository {
        &self.grades
    }

    /// Recomputes the overall grade of a course from its categories and
    /// stored grades, and saves it. Returns the updated course, or `None` if
    /// there is no course with `course_id`.
    pub async fn refresh_course_grade(&self, course_id: i64) -> StoreResult<Option<Course>> {
        let Some(course) = self.courses.get_by_id(course_id).await? else {
            return Ok(None);
        };
        self.refresh(&course).await.map(Some)
    }

    /// Recomputes and saves the overall grade of every course, concurrently.
    /// Courses whose grade could not be saved are logged and left out of the
    /// returned list.
    pub async fn refresh_all_course_grades(&self) -> StoreResult<Vec<Course>> {
        let courses = self.courses.get_all().await?;
        let refreshed = join_all(courses.iter().map(|course| self.refresh(course))).await;

        Ok(courses
            .iter()
            .zip(refreshed)
            .filter_map(|(course, result)| match result {
                Ok(updated) => Some(updated),
                Err(e) => {
                    tracing::error!("Error updating course grade for {}: {e}", course.id);
                    None
                }
            })
            .collect())
    }

    /// Computes and stores the grade of an already loaded course.
    async fn refresh(&self, course: &Course) -> StoreResult<Course> {
        let grade = self
            .grades
            .calculate_course_grade(course.id, &course.grade_categories)
            .await;
        tracing::debug!("Course {} ({}) grade: {grade}", course.id, course.code);
        self.courses.update_grade(course.id, grade).await
    }
}
