#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::entities::{GradeCategory, GradeRecord};

/// Computes a course's overall percentage grade from its grade records.
///
/// Each category contributes the mean score of the grades whose `category`
/// equals its `name` exactly, weighted by `weight / 100`. Categories without
/// grades are left out of both the weighted sum and the total weight, so the
/// result is normalised over the categories that have data rather than
/// penalised for the ones that do not. Grades in a category that is not
/// configured are ignored.
///
/// The ratio is rounded with [`f64::round`] (half away from zero). Returns 0
/// when there are no grades, no categories, or the matched categories weigh
/// nothing in total. Inputs are not clamped: negative or out-of-range scores
/// and weights flow through the arithmetic as given.
pub fn compute_course_grade(course_grades: &[GradeRecord], categories: &[GradeCategory]) -> i64 {
    if course_grades.is_empty() {
        return 0;
    }

    let mut total_weighted_score = 0.0;
    let mut total_weight = 0.0;

    for category in categories {
        let (sum, count) = course_grades
            .iter()
            .filter(|grade| grade.category == category.name)
            .fold((0.0, 0usize), |(sum, count), grade| (sum + grade.score, count + 1));
        if count == 0 {
            continue;
        }
        let average = sum / count as f64;
        total_weighted_score += average * (category.weight / 100.0);
        total_weight += category.weight / 100.0;
    }

    if total_weight <= 0.0 {
        return 0;
    }

    let ratio = total_weighted_score / total_weight;
    if !ratio.is_finite() {
        tracing::warn!("Course grade is not a finite number ({ratio}); reporting 0");
        return 0;
    }
    ratio.round() as i64
}
