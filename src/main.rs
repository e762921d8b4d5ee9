#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # coursebook
//!
//! A terminal front-end for a course planner's record store: list courses,
//! assignments and grades, mark work as done, and recompute course grades.
//!
//! Credentials come from `SUPABASE_URL` and `SUPABASE_ANON_KEY`, read from
//! the environment or a `.env` file.

use anyhow::{Context, Result};
use bpaf::*;
use chrono::{DateTime, Local, Utc};
use coursebook::{
    Assignment, Config, Course, GradeRecord, compute_course_grade, constants::STATUS_COMPLETED,
};
use dotenvy::dotenv;
use itertools::Itertools;
use tabled::{Table, Tabled};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// List courses
    Courses,
    /// List assignments, optionally for one course
    Assignments(Option<i64>),
    /// List open assignments due soon, optionally overriding the window
    Upcoming(Option<i64>),
    /// List open assignments due today
    Today,
    /// Mark an assignment completed
    Complete(i64),
    /// List a course's grades and its computed grade
    Grades(i64),
    /// Recompute and save course grades, for one course or all of them
    Recalc(Option<i64>),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses a course id flag
    fn course() -> impl Parser<Option<i64>> {
        long("course")
            .short('c')
            .help("Only show assignments of this course")
            .argument::<i64>("COURSE_ID")
            .optional()
    }

    /// parses a day-count flag
    fn days() -> impl Parser<Option<i64>> {
        long("days")
            .short('d')
            .help("How many days ahead to look")
            .argument::<i64>("DAYS")
            .optional()
    }

    /// parses a course id
    fn course_id() -> impl Parser<i64> {
        positional::<i64>("COURSE_ID").help("Id of the course")
    }

    /// parses an optional course id
    fn maybe_course_id() -> impl Parser<Option<i64>> {
        positional::<i64>("COURSE_ID")
            .help("Id of the course; all courses when omitted")
            .optional()
    }

    /// parses an assignment id
    fn assignment_id() -> impl Parser<i64> {
        positional::<i64>("ASSIGNMENT_ID").help("Id of the assignment")
    }

    let courses = pure(Cmd::Courses)
        .to_options()
        .command("courses")
        .help("List courses");

    let assignments = construct!(Cmd::Assignments(course()))
        .to_options()
        .command("assignments")
        .help("List assignments");

    let upcoming = construct!(Cmd::Upcoming(days()))
        .to_options()
        .command("upcoming")
        .help("List open assignments due soon");

    let today = pure(Cmd::Today)
        .to_options()
        .command("today")
        .help("List open assignments due today");

    let complete = construct!(Cmd::Complete(assignment_id()))
        .to_options()
        .command("complete")
        .help("Mark an assignment completed");

    let grades = construct!(Cmd::Grades(course_id()))
        .to_options()
        .command("grades")
        .help("List a course's grades and its overall grade");

    let recalc = construct!(Cmd::Recalc(maybe_course_id()))
        .to_options()
        .command("recalc")
        .help("Recompute and save overall course grades");

    let cmd = construct!([courses, assignments, upcoming, today, complete, grades, recalc]);

    cmd.to_options()
        .descr("Courses, assignments and grades from your record store")
        .run()
}

/// A course as shown in a table.
#[derive(Tabled)]
struct CourseLine {
    #[tabled(rename = "Id")]
    /// Store id
    id:         i64,
    #[tabled(rename = "Code")]
    /// Course code
    code:       String,
    #[tabled(rename = "Name")]
    /// Course name
    name:       String,
    #[tabled(rename = "Instructor")]
    /// Instructor
    instructor: String,
    #[tabled(rename = "Credits")]
    /// Credit hours
    credits:    i64,
    #[tabled(rename = "Grade")]
    /// Stored overall grade
    grade:      String,
    #[tabled(rename = "Schedule")]
    /// Meeting times
    schedule:   String,
}

impl From<&Course> for CourseLine {
    fn from(course: &Course) -> Self {
        Self {
            id:         course.id,
            code:       course.code.clone(),
            name:       course.name.clone(),
            instructor: course.instructor.clone(),
            credits:    course.credits,
            grade:      format!("{}%", course.current_grade),
            schedule:   course.schedule.iter().join(", "),
        }
    }
}

/// An assignment as shown in a table.
#[derive(Tabled)]
struct AssignmentLine {
    #[tabled(rename = "Id")]
    /// Store id
    id:       i64,
    #[tabled(rename = "Title")]
    /// Title
    title:    String,
    #[tabled(rename = "Due")]
    /// Due date in local time
    due:      String,
    #[tabled(rename = "Priority")]
    /// Priority
    priority: String,
    #[tabled(rename = "Status")]
    /// Status
    status:   String,
    #[tabled(rename = "Grade")]
    /// Grade, if graded
    grade:    String,
    #[tabled(rename = "Course")]
    /// Owning course id
    course:   String,
}

impl From<&Assignment> for AssignmentLine {
    fn from(a: &Assignment) -> Self {
        Self {
            id:       a.id,
            title:    a.title.clone(),
            due:      local_time(a.due_date),
            priority: a.priority.clone(),
            status:   a.status.clone(),
            grade:    a.grade.map(|g| g.to_string()).unwrap_or_else(|| "-".into()),
            course:   a.course_id.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        }
    }
}

/// A grade as shown in a table.
#[derive(Tabled)]
struct GradeLine {
    #[tabled(rename = "Id")]
    /// Store id
    id:       i64,
    #[tabled(rename = "Title")]
    /// Title
    title:    String,
    #[tabled(rename = "Category")]
    /// Category
    category: String,
    #[tabled(rename = "Score")]
    /// Score
    score:    f64,
    #[tabled(rename = "Date")]
    /// Date recorded, local time
    date:     String,
}

impl From<&GradeRecord> for GradeLine {
    fn from(g: &GradeRecord) -> Self {
        Self {
            id:       g.id,
            title:    g.title.clone(),
            category: g.category.clone(),
            score:    g.score,
            date:     local_time(g.date),
        }
    }
}

/// Formats a timestamp in local time for display.
fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Prints assignments as a table, or a note when there are none.
fn print_assignments(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments.");
    } else {
        println!("{}", Table::new(assignments.iter().map(AssignmentLine::from)));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cmd = options();
    let config = Config::from_env()?;

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(config.log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let gradebook = config.gradebook();

    match cmd {
        Cmd::Courses => {
            let courses = gradebook.courses().get_all().await?;
            println!("{}", Table::new(courses.iter().map(CourseLine::from)));
        }
        Cmd::Assignments(course) => {
            let assignments = match course {
                Some(id) => gradebook.assignments().get_by_course_id(id).await?,
                None => gradebook.assignments().get_all().await?,
            };
            print_assignments(&assignments);
        }
        Cmd::Upcoming(days) => {
            let days = days.unwrap_or(config.upcoming_days());
            let assignments = gradebook.assignments().get_upcoming(days).await?;
            print_assignments(&assignments);
        }
        Cmd::Today => {
            let assignments = gradebook.assignments().get_todays_tasks().await?;
            print_assignments(&assignments);
        }
        Cmd::Complete(id) => {
            let assignment = gradebook
                .assignments()
                .update_status(id, STATUS_COMPLETED)
                .await
                .with_context(|| format!("Could not mark assignment {id} completed"))?;
            println!("Completed: {}", assignment.title);
        }
        Cmd::Grades(course_id) => {
            let course = gradebook
                .courses()
                .get_by_id(course_id)
                .await?
                .with_context(|| format!("No course with id {course_id}"))?;
            let grades = gradebook.grades().get_by_course_id(course_id).await?;
            if !grades.is_empty() {
                println!("{}", Table::new(grades.iter().map(GradeLine::from)));
            }
            let overall = compute_course_grade(&grades, &course.grade_categories);
            println!("{} {}: {overall}%", course.code, course.name);
        }
        Cmd::Recalc(course_id) => {
            let courses = match course_id {
                Some(id) => gradebook
                    .refresh_course_grade(id)
                    .await?
                    .into_iter()
                    .collect::<Vec<_>>(),
                None => gradebook.refresh_all_course_grades().await?,
            };
            if courses.is_empty() {
                eprintln!("No courses updated.");
            }
            for course in courses {
                println!("{} {}: {}%", course.code, course.name, course.current_grade);
            }
        }
    };

    Ok(())
}
