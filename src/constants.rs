#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Table holding assignment records
pub const ASSIGNMENT_TABLE: &str = "assignment_c";

/// Table holding course records
pub const COURSE_TABLE: &str = "course_c";

/// Table holding grade records
pub const GRADE_TABLE: &str = "grade_c";

/// Field of a course pulled through `course_id_c` references
pub const COURSE_REFERENCE_FIELD: &str = "name_c";

/// Assignment status that excludes it from upcoming and today's task lists
pub const STATUS_COMPLETED: &str = "completed";

/// Status given to assignments stored without one
pub const STATUS_PENDING: &str = "pending";

/// Priority given to assignments stored without one
pub const PRIORITY_MEDIUM: &str = "medium";

/// Credits assumed for a course stored without any
pub const DEFAULT_CREDITS: i64 = 3;

/// Display color assumed for a course stored without one
pub const DEFAULT_COURSE_COLOR: &str = "#4F46E5";

/// Look-ahead window, in days, for upcoming assignments
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Grading categories given to courses stored without any, as stored in
/// `grade_categories_c`
/// * Exams: 40
/// * Assignments: 35
/// * Participation: 15
/// * Projects: 10
pub const DEFAULT_GRADE_CATEGORIES_JSON: &str = r#"[{"name":"Exams","weight":40},{"name":"Assignments","weight":35},{"name":"Participation","weight":15},{"name":"Projects","weight":10}]"#;
